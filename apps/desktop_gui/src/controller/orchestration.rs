//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = match &cmd {
        BackendCommand::Segment { .. } => "segment",
        BackendCommand::CancelSegment => "cancel_segment",
        BackendCommand::FetchResultImage { .. } => "fetch_result_image",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected; restart the application".to_string();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn queues_commands_and_reports_full_queue() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(
            &tx,
            BackendCommand::CancelSegment,
            &mut status
        ));
        assert!(status.is_empty());
        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::CancelSegment,
            &mut status
        ));
        assert_eq!(status, "UI command queue is full; please retry");
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::CancelSegment));
    }

    #[test]
    fn reports_disconnected_worker() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();

        assert!(!dispatch_backend_command(
            &tx,
            BackendCommand::CancelSegment,
            &mut status
        ));
        assert!(status.contains("disconnected"));
    }
}
