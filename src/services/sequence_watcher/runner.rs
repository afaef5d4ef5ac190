use crate::error::{Result, SeqError};
use crate::events::InputEvent;
use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::navigator::Navigator;
use super::watcher::SequenceWatcher;

/// Управление запущенным наблюдателем
pub struct WatcherHandle<N, R> {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<SequenceWatcher<N, R>>,
}

impl<N, R> SequenceWatcher<N, R>
where
    N: Navigator + 'static,
    R: Rng + Send + 'static,
{
    /// Подписаться на поток событий и запустить цикл обработки
    pub fn start(self, events: mpsc::Receiver<InputEvent>) -> WatcherHandle<N, R> {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(events, shutdown_rx));

        WatcherHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn run(
        mut self,
        mut events: mpsc::Receiver<InputEvent>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Self {
        info!("SequenceWatcher запущен");

        loop {
            let deadline = self.next_deadline();

            // События идут первыми: всё, что уже доставлено, обрабатывается до остановки
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(event) => {
                        self.handle_event(&event, Instant::now());
                    }
                    None => {
                        info!("Все источники событий закрыты");
                        break;
                    }
                },
                _ = wait_for(deadline) => {
                    self.expire(Instant::now());
                }
                _ = &mut shutdown => {
                    debug!("Получен сигнал остановки SequenceWatcher");
                    break;
                }
            }
        }

        self.clear();
        info!("SequenceWatcher остановлен");
        self
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<N, R> WatcherHandle<N, R> {
    /// Отписаться от событий, отменить отложенную очистку и вернуть наблюдатель
    pub async fn stop(mut self) -> Result<SequenceWatcher<N, R>> {
        if let Some(shutdown) = self.shutdown.take() {
            // Цикл мог уже завершиться сам, если источники закрыты
            let _ = shutdown.send(());
        }

        self.task
            .await
            .map_err(|e| SeqError::Internal(format!("Задача SequenceWatcher завершилась с ошибкой: {}", e)))
    }
}
