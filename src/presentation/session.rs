// Terminal session - Turns typed commands into page interactions
use crate::application::ports::ControlSource;
use crate::application::ui_controller::UiEvent;
use crate::domain::params::ControlValue;
use crate::infrastructure::config::ControlKind;
use crate::infrastructure::memory_controls::MemoryControls;
use crate::presentation::commands::{Command, CommandError, USAGE, parse_command};
use async_stream::stream;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;

/// Parsed commands from a line reader; blank lines are skipped and bad lines reported
pub fn command_stream<R>(reader: R) -> impl Stream<Item = Command>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream! {
        let mut lines = LinesStream::new(reader.lines());
        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => match parse_command(&line) {
                    Ok(command) => yield command,
                    Err(CommandError::Empty) => {}
                    Err(e) => println!("{}", e),
                },
                Err(e) => {
                    tracing::error!("Error reading commands: {}", e);
                    break;
                }
            }
        }
    }
}

pub struct Session {
    controls: Arc<MemoryControls>,
    events: mpsc::Sender<UiEvent>,
}

impl Session {
    pub fn new(controls: Arc<MemoryControls>, events: mpsc::Sender<UiEvent>) -> Self {
        Self { controls, events }
    }

    /// Feed commands until `quit` or end of input, then shut the controller down
    pub async fn run<S>(self, commands: S)
    where
        S: Stream<Item = Command>,
    {
        let mut commands = std::pin::pin!(commands);
        while let Some(command) = commands.next().await {
            if !self.apply(command).await {
                return;
            }
        }
        let _ = self.events.send(UiEvent::Shutdown).await;
    }

    /// Returns false once the session should end
    pub async fn apply(&self, command: Command) -> bool {
        let event = match command {
            Command::Tab(view) => UiEvent::SelectTab(view),
            Command::Set { control, value } => {
                let value = match self.controls.kind(&control) {
                    Some(ControlKind::Checkbox) => ControlValue::Checked(value == "true" || value == "on"),
                    _ => ControlValue::Text(value),
                };
                match self.change(&control, value) {
                    Some(event) => event,
                    None => return true,
                }
            }
            Command::Check { control, checked } => {
                match self.change(&control, ControlValue::Checked(checked)) {
                    Some(event) => event,
                    None => return true,
                }
            }
            Command::Resize => UiEvent::Resized,
            Command::Theme => UiEvent::ToggleTheme,
            Command::Print => UiEvent::Print,
            Command::Export { table, filename } => UiEvent::ExportTable {
                table_id: table,
                filename,
            },
            Command::Help => {
                println!("{}", USAGE);
                return true;
            }
            Command::Quit => {
                let _ = self.events.send(UiEvent::Shutdown).await;
                return false;
            }
        };

        self.events.send(event).await.is_ok()
    }

    fn change(&self, control: &str, value: ControlValue) -> Option<UiEvent> {
        if !self.controls.contains(control) {
            println!("no control {} on this page", control);
            return None;
        }
        if !self.controls.assign(control, value) {
            println!("control {} rejected the value", control);
            return None;
        }
        Some(UiEvent::ControlChanged(control.to_string()))
    }
}
