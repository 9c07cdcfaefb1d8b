use crate::digest::{Pair, Word, WordHasher};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Word queue receiver shared by every worker of the pool.
pub(crate) type SharedWordQueue = Arc<Mutex<mpsc::Receiver<Word>>>;

/// One hasher worker. Runs until the word queue is closed and empty, then
/// returns how many pairs it produced.
pub(crate) async fn run_hasher(
    worker: usize,
    words: SharedWordQueue,
    pairs: mpsc::Sender<Pair>,
    hasher: Arc<dyn WordHasher>,
) -> u64 {
    let mut produced = 0u64;

    loop {
        // Only the receive happens under the lock; hashing runs unlocked.
        let next = {
            let mut queue = words.lock().await;
            queue.recv().await
        };
        let Some(word) = next else {
            break;
        };

        let pair = hasher.pair(word);
        if pairs.send(pair).await.is_err() {
            log::warn!("Hasher {worker}: pair queue dropped, stopping early");
            break;
        }
        produced += 1;
    }

    log::debug!("Hasher {worker} drained after {produced} words");
    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha256Hasher;
    use pretty_assertions::assert_eq;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn workers_share_the_queue_and_hash_every_word_once() {
        let (word_tx, word_rx) = mpsc::channel(4);
        let (pair_tx, mut pair_rx) = mpsc::channel(64);
        let queue: SharedWordQueue = Arc::new(Mutex::new(word_rx));
        let hasher: Arc<dyn WordHasher> = Arc::new(Sha256Hasher::new());

        let workers: Vec<_> = (0..3)
            .map(|id| tokio::spawn(run_hasher(id, queue.clone(), pair_tx.clone(), hasher.clone())))
            .collect();
        drop(queue);
        drop(pair_tx);

        for i in 0..20 {
            word_tx.send(Word::from(format!("w{i}"))).await.unwrap();
        }
        drop(word_tx);

        let mut total = 0;
        for worker in workers {
            total += worker.await.unwrap();
        }
        assert_eq!(total, 20);

        let mut seen = Vec::new();
        while let Some(pair) = pair_rx.recv().await {
            assert_eq!(pair.digest, hasher.digest(pair.word.as_bytes()));
            seen.push(pair.word.to_string());
        }
        seen.sort();
        let mut expected: Vec<String> = (0..20).map(|i| format!("w{i}")).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn worker_exits_when_pair_queue_is_gone() {
        let (word_tx, word_rx) = mpsc::channel(4);
        let (pair_tx, pair_rx) = mpsc::channel(1);
        drop(pair_rx);
        word_tx.send(Word::from("a")).await.unwrap();
        drop(word_tx);

        let produced = run_hasher(
            0,
            Arc::new(Mutex::new(word_rx)),
            pair_tx,
            Arc::new(Sha256Hasher::new()),
        )
        .await;
        assert_eq!(produced, 0);
    }
}
