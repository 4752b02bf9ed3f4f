//! Queue Poller - Background work item consumer
//!
//! Claims one work item at a time, hands it to the ReplyService and
//! acknowledges it on success. Failed items stay unacknowledged and are
//! redelivered once their visibility timeout lapses.

use std::sync::Arc;
use std::time::Duration;

use relay::{ChatIntegration, DomainError, LlmProvider, PersonaRepository, WorkQueue};

use crate::application::ReplyService;

/// Items claimed per receive; a failure only ever affects one item
const BATCH_SIZE: u32 = 1;

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// How long a claimed item stays hidden from other pollers
    pub visibility_timeout: Duration,
    /// Sleep between polls when the queue is empty
    pub poll_interval: Duration,
    /// Number of concurrent poll loops
    pub workers: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            visibility_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            workers: 1,
        }
    }
}

/// Result of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Empty,
    Replied,
    Failed,
}

pub struct QueuePoller<Q, R, L, C>
where
    Q: WorkQueue + ?Sized,
    R: PersonaRepository + ?Sized,
    L: LlmProvider + ?Sized,
    C: ChatIntegration + ?Sized,
{
    queue: Arc<Q>,
    replies: Arc<ReplyService<R, L, C>>,
    config: PollerConfig,
}

impl<Q, R, L, C> Clone for QueuePoller<Q, R, L, C>
where
    Q: WorkQueue + ?Sized,
    R: PersonaRepository + ?Sized,
    L: LlmProvider + ?Sized,
    C: ChatIntegration + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            replies: self.replies.clone(),
            config: self.config.clone(),
        }
    }
}

impl<Q, R, L, C> QueuePoller<Q, R, L, C>
where
    Q: WorkQueue + ?Sized + 'static,
    R: PersonaRepository + ?Sized + 'static,
    L: LlmProvider + ?Sized + 'static,
    C: ChatIntegration + ?Sized + 'static,
{
    pub fn new(
        queue: Arc<Q>,
        replies: Arc<ReplyService<R, L, C>>,
        config: PollerConfig,
    ) -> Self {
        Self {
            queue,
            replies,
            config,
        }
    }

    /// Start `workers` poll loops (run in background)
    pub fn start(self) -> Vec<tokio::task::JoinHandle<()>> {
        let workers = self.config.workers.max(1);
        tracing::info!(
            "📬 Queue poller started ({} worker(s), visibility: {:?})",
            workers,
            self.config.visibility_timeout
        );

        (0..workers)
            .map(|worker| {
                let poller = self.clone();
                tokio::spawn(async move { poller.run(worker).await })
            })
            .collect()
    }

    /// Run one poll loop
    async fn run(self, worker: usize) {
        loop {
            match self.poll_once().await {
                Ok(PollOutcome::Empty) => tokio::time::sleep(self.config.poll_interval).await,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Worker {}: queue unavailable: {}", worker, e);
                    tokio::time::sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    /// Claim and process at most one item.
    ///
    /// Errors are reserved for the queue itself; a failed item is reported
    /// as `PollOutcome::Failed` and left for redelivery.
    pub async fn poll_once(&self) -> Result<PollOutcome, DomainError> {
        let messages = self
            .queue
            .receive(BATCH_SIZE, self.config.visibility_timeout)
            .await?;

        let Some(message) = messages.into_iter().next() else {
            return Ok(PollOutcome::Empty);
        };

        match self.replies.handle(&message).await {
            Ok(()) => {
                self.queue.ack(message.id).await?;
                Ok(PollOutcome::Replied)
            }
            Err(e) => {
                tracing::error!(
                    "Work item {} failed (receive #{}): {}",
                    message.id,
                    message.receive_count,
                    e
                );
                Ok(PollOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::CompletionService;
    use crate::testing::{InMemoryPersonaRepository, InMemoryWorkQueue, RecordingChat, ScriptedLlm};
    use relay::{Persona, WorkItem};

    type TestPoller =
        QueuePoller<InMemoryWorkQueue, InMemoryPersonaRepository, ScriptedLlm, RecordingChat>;

    fn poller(queue: Arc<InMemoryWorkQueue>, chat: Arc<RecordingChat>) -> TestPoller {
        let repo = Arc::new(InMemoryPersonaRepository::with(&[Persona::new(
            "Einstein",
            "You are Albert Einstein.",
        )]));
        let completion = Arc::new(CompletionService::new(
            repo,
            Arc::new(ScriptedLlm::replying("Relativity!")),
        ));
        let replies = Arc::new(ReplyService::new(completion, chat, 150));
        QueuePoller::new(queue, replies, PollerConfig::default())
    }

    #[tokio::test]
    async fn test_empty_queue() {
        let queue = Arc::new(InMemoryWorkQueue::default());
        let poller = poller(queue, Arc::new(RecordingChat::default()));

        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Empty);
    }

    #[tokio::test]
    async fn test_success_acks_item() {
        let queue = Arc::new(InMemoryWorkQueue::default());
        let chat = Arc::new(RecordingChat::default());
        queue
            .send_work_item(&WorkItem::new("C123", "Hello", "Einstein"))
            .await
            .unwrap();

        let poller = poller(queue.clone(), chat.clone());
        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Replied);

        assert!(queue.bodies().is_empty());
        assert_eq!(
            chat.sent(),
            vec![("C123".to_string(), "Relativity!".to_string())]
        );
    }

    #[tokio::test]
    async fn test_one_item_per_poll() {
        let queue = Arc::new(InMemoryWorkQueue::default());
        let chat = Arc::new(RecordingChat::default());
        for channel in ["C1", "C2"] {
            queue
                .send_work_item(&WorkItem::new(channel, "Hi", "Einstein"))
                .await
                .unwrap();
        }

        let poller = poller(queue.clone(), chat.clone());
        poller.poll_once().await.unwrap();

        assert_eq!(chat.sent().len(), 1);
        assert_eq!(queue.bodies().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_item_for_redelivery() {
        let queue = Arc::new(InMemoryWorkQueue::default());
        let chat = Arc::new(RecordingChat::failing());
        queue
            .send_work_item(&WorkItem::new("C123", "Hello", "Einstein"))
            .await
            .unwrap();

        let poller = poller(queue.clone(), chat);
        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Failed);

        // Hidden while the visibility timeout runs
        assert_eq!(queue.bodies().len(), 1);
        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Empty);

        queue.expire_visibility();
        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Failed);
    }

    #[tokio::test]
    async fn test_exhausted_item_is_dead_lettered() {
        let queue = Arc::new(InMemoryWorkQueue::with_max_receive_count(2));
        queue
            .send_work_item(&WorkItem::new("C123", "Hello", "Nobody"))
            .await
            .unwrap();

        let poller = poller(queue.clone(), Arc::new(RecordingChat::default()));
        for _ in 0..2 {
            assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Failed);
            queue.expire_visibility();
        }

        assert_eq!(poller.poll_once().await.unwrap(), PollOutcome::Empty);
        assert_eq!(queue.dead_letters(), 1);
    }
}
