// Interactive typing simulator for the live preview.
// Run with: cargo run --bin preview_sim
use anyhow::Result;
use bridge_core::{Preview, Priority, TranslationEngine, TranslationResult};
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{queue, ExecutableCommand};
use std::io::{stdout, Stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;

const TARGETS: &[&str] = &["hindi", "tamil", "bengali", "telugu", "russian", "greek", "arabic"];
const HISTORY: usize = 8;

struct Terminal {
    out: Stdout,
}

impl Terminal {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        out.execute(EnterAlternateScreen)?;
        Ok(Self { out })
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.out.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

struct Screen<'a> {
    input: &'a str,
    target: &'a str,
    preview: &'a Preview,
    sent: &'a [TranslationResult],
}

fn draw(out: &mut Stdout, screen: &Screen<'_>) -> Result<()> {
    let loading = if screen.preview.is_loading { " …" } else { "" };
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print("Live preview  [Tab] language  [Enter] send  [Esc] quit"),
        MoveTo(0, 2),
        Print(format!("target : {}", screen.target)),
        MoveTo(0, 3),
        Print(format!("input  : {}", screen.input)),
        MoveTo(0, 4),
        Print(format!("preview: {}{}", screen.preview.text, loading)),
        MoveTo(0, 6),
        Print("sent:"),
    )?;
    for (row, result) in screen.sent.iter().rev().take(HISTORY).enumerate() {
        queue!(
            out,
            MoveTo(2, 7 + row as u16),
            Print(format!(
                "{} -> {} ({:.2})",
                result.original_text, result.text, result.confidence
            ))
        )?;
    }
    queue!(out, MoveTo(9 + screen.input.chars().count() as u16, 3))?;
    out.flush()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let engine = TranslationEngine::new();
    let live = engine.live_preview();
    let mut previews = live.subscribe();

    let (key_tx, mut keys) = mpsc::unbounded_channel::<KeyEvent>();
    let (sent_tx, mut sent_rx) = mpsc::unbounded_channel::<TranslationResult>();

    let mut term = Terminal::enter()?;

    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        loop {
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && key_tx.send(key).is_err() {
                        return Ok(());
                    }
                }
            } else if key_tx.is_closed() {
                return Ok(());
            }
        }
    });

    let mut input = String::new();
    let mut target = 0usize;
    let mut sent: Vec<TranslationResult> = Vec::new();

    loop {
        let preview = previews.borrow_and_update().clone();
        draw(&mut term.out, &Screen { input: &input, target: TARGETS[target], preview: &preview, sent: &sent })?;

        tokio::select! {
            changed = previews.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            Some(result) = sent_rx.recv() => sent.push(result),
            key = keys.recv() => {
                let Some(key) = key else { break };
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Tab => {
                        target = (target + 1) % TARGETS.len();
                        live.update(&input, TARGETS[target]);
                    }
                    KeyCode::Backspace => {
                        input.pop();
                        live.update(&input, TARGETS[target]);
                    }
                    KeyCode::Enter if !input.trim().is_empty() => {
                        live.cancel();
                        let handle = engine.enqueue_translation(&input, "english", TARGETS[target], Priority::High)?;
                        let tx = sent_tx.clone();
                        tokio::spawn(async move {
                            if let Ok(result) = handle.await {
                                let _ = tx.send(result);
                            }
                        });
                        input.clear();
                        live.update(&input, TARGETS[target]);
                    }
                    KeyCode::Char(c) => {
                        input.push(c);
                        live.update(&input, TARGETS[target]);
                    }
                    _ => {}
                }
            }
        }
    }

    drop(keys);
    drop(term);
    Ok(())
}
