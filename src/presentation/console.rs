// Console event loop - Feeds user commands and poll results into the panel controller
use crate::application::panel_controller::PanelController;
use crate::application::poll_scheduler::PollOutcome;
use crate::presentation::commands::{Command, parse_line};
use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Parsed commands from a line-oriented reader; invalid lines are logged and skipped.
pub fn command_stream<R>(reader: R) -> impl Stream<Item = Command>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async_stream::stream! {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(Some(command)) => yield command,
                    Ok(None) => {}
                    Err(e) => tracing::warn!("Ignoring input: {}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    }
}

/// Runs until `quit`, end of input or Ctrl+C, then tears the panel down.
pub async fn run_console<S>(
    mut controller: PanelController,
    mut outcomes: mpsc::UnboundedReceiver<PollOutcome>,
    commands: S,
) where
    S: Stream<Item = Command>,
{
    futures::pin_mut!(commands);
    let shutdown = tokio::signal::ctrl_c();
    futures::pin_mut!(shutdown);

    loop {
        tokio::select! {
            Some(outcome) = outcomes.recv() => controller.apply_outcome(outcome),
            command = commands.next() => match command {
                None | Some(Command::Quit) => break,
                Some(command) => {
                    dispatch(&mut controller, command);
                    tracing::debug!(
                        "Handled {:?} (state: {:?}, polling: {})",
                        command,
                        controller.state(),
                        controller.is_polling()
                    );
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    controller.destroy();
}

pub fn dispatch(controller: &mut PanelController, command: Command) {
    match command {
        Command::Toggle => controller.toggle_visibility(),
        Command::Show => controller.show(),
        Command::Hide => controller.hide(),
        Command::Minimize => controller.toggle_minimize(),
        Command::Refresh => controller.refresh(),
        Command::SetInterval(ms) => {
            controller.set_poll_interval(ms);
        }
        Command::Move { left, top } => {
            controller.set_position(left, top);
        }
        Command::Drag { from, to } => {
            if controller.pointer_down(from) {
                controller.pointer_move(to);
                controller.pointer_up();
            } else {
                tracing::warn!("Drag must start on the panel header");
            }
        }
        Command::Resize(viewport) => controller.resize_viewport(viewport),
        Command::Quit => {}
    }
}
