// Drives an external live-coding REPL as a child process over stdin, the way
// editor plugins talk to ghci or a node REPL. Its stdout is read on a
// separate thread; JSON lines shaped like a DrawFrame become piano-roll
// frames and everything else is console output.
use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{bail, Context};
use crossbeam_channel::Sender;
use tracing::{debug, info};

use super::engine::{EngineOutput, LiveEngine};
use super::frame::DrawFrame;

#[derive(Clone, Debug, Default)]
pub struct ReplConfig {
    pub command: Vec<String>,
    pub boot: Vec<String>, // sent once, on audio unlock
    pub hush: String,      // sent on stop
    pub block_start: Option<String>, // wraps multi-line code, e.g. ":{"
    pub block_end: Option<String>,
}

pub struct ReplEngine {
    child: Child,
    stdin: ChildStdin,
    config: ReplConfig,
    code: String,
}

impl ReplEngine {
    pub fn spawn(config: ReplConfig, output: Sender<EngineOutput>) -> anyhow::Result<Self> {
        let Some((program, args)) = config.command.split_first() else {
            bail!("no engine command given");
        };
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start engine `{program}`"))?;
        info!(program = %program, pid = child.id(), "engine started");

        let stdin = child.stdin.take().context("engine stdin unavailable")?;
        let stdout = child.stdout.take().context("engine stdout unavailable")?;
        let stderr = child.stderr.take().context("engine stderr unavailable")?;

        let tx = output.clone();
        std::thread::spawn(move || {
            forward_lines(stdout, &tx);
            // must arrive even when the channel is full; this thread ends here
            let _ = tx.send(EngineOutput::Exited);
        });
        std::thread::spawn(move || forward_lines(stderr, &output));

        Ok(Self { child, stdin, config, code: String::new() })
    }

    fn write_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> anyhow::Result<()> {
        for line in lines {
            writeln!(self.stdin, "{line}").context("writing to engine")?;
        }
        self.stdin.flush().context("flushing engine input")?;
        Ok(())
    }
}

impl LiveEngine for ReplEngine {
    fn unlock_audio(&mut self) -> anyhow::Result<bool> {
        let boot = self.config.boot.clone();
        self.write_lines(boot.iter().map(String::as_str))?;
        debug!(lines = boot.len(), "boot lines sent");
        Ok(true)
    }

    fn set_code(&mut self, code: &str) -> anyhow::Result<()> {
        self.code = code.to_string();
        Ok(())
    }

    fn evaluate(&mut self) -> anyhow::Result<()> {
        let block = code_block(&self.code, &self.config);
        self.write_lines(block.iter().map(String::as_str))
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        let hush = self.config.hush.clone();
        self.write_lines([hush.as_str()])
    }
}

impl Drop for ReplEngine {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn forward_lines(reader: impl Read, tx: &Sender<EngineOutput>) {
    for line in BufReader::new(reader).lines() {
        let Ok(line) = line else { break };
        // full channel: drop the line rather than stall the engine
        let _ = tx.try_send(parse_output_line(line));
    }
}

pub(super) fn parse_output_line(line: String) -> EngineOutput {
    match serde_json::from_str::<DrawFrame>(&line) {
        Ok(frame) => EngineOutput::Draw(frame),
        Err(_) => EngineOutput::Console(line),
    }
}

// Lines written for one evaluation: the code, optionally fenced.
fn code_block(code: &str, config: &ReplConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(start) = &config.block_start {
        lines.push(start.clone());
    }
    lines.extend(code.lines().map(str::to_string));
    if let Some(end) = &config.block_end {
        lines.push(end.clone());
    }
    lines
}
