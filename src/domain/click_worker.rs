//! Background consumer for the click queue.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::application::services::ClickService;
use crate::domain::click_event::ClickEvent;

/// Drains the click queue and records every event.
///
/// At most `concurrency` recordings are in flight at once; when all permits
/// are taken the worker stops pulling from the channel and the bounded queue
/// absorbs the burst. Failed recordings are logged and dropped, never retried.
///
/// Returns once every sender is dropped and all in-flight writes finished,
/// which is how shutdown drains the queue.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickService>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let recorder = recorder.clone();
        in_flight.spawn(async move {
            let _permit = permit;
            process_event(&recorder, event).await;
        });

        // Reap finished tasks so the set does not grow with the queue.
        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}
    info!("Click worker stopped");
}

async fn process_event(recorder: &ClickService, event: ClickEvent) {
    let link_id = event.link_id;
    let short_code = event.short_code.clone();

    match recorder.record_event(event).await {
        Ok(click) => {
            metrics::counter!("clicks_recorded_total").increment(1);
            debug!(link_id, click_id = click.id, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(link_id, short_code, error = %e, "Failed to record click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Click;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(link_id: i64) -> ClickEvent {
        ClickEvent::new(
            link_id,
            "abc123".to_string(),
            None,
            Some("TestBot/1.0"),
            "127.0.0.1".to_string(),
        )
    }

    #[tokio::test]
    async fn test_worker_records_every_event_then_stops() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        links
            .expect_increment_click_count()
            .times(25)
            .returning(|_| Ok(()));
        clicks.expect_insert().times(25).returning(|c| {
            Ok(Click::new(1, c.link_id, c.clicked_at, c.referrer, c.user_agent, c.ip))
        });

        let recorder = Arc::new(ClickService::new(Arc::new(links), Arc::new(clicks)));
        let (tx, rx) = mpsc::channel(100);

        for _ in 0..25 {
            tx.try_send(event(1)).unwrap();
        }
        drop(tx);

        run_click_worker(rx, recorder, 4).await;
    }

    #[tokio::test]
    async fn test_worker_survives_failures() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let inserted = Arc::new(AtomicUsize::new(0));

        links.expect_increment_click_count().returning(|link_id| {
            if link_id == 13 {
                Err(AppError::internal("Database error", json!({})))
            } else {
                Ok(())
            }
        });
        let counter = inserted.clone();
        clicks.expect_insert().returning(move |c| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Click::new(1, c.link_id, c.clicked_at, c.referrer, c.user_agent, c.ip))
        });

        let recorder = Arc::new(ClickService::new(Arc::new(links), Arc::new(clicks)));
        let (tx, rx) = mpsc::channel(10);

        tx.try_send(event(13)).unwrap();
        tx.try_send(event(1)).unwrap();
        tx.try_send(event(2)).unwrap();
        drop(tx);

        run_click_worker(rx, recorder, 1).await;

        assert_eq!(inserted.load(Ordering::SeqCst), 2);
    }
}
