//! Breadth-first crawl frontier
//!
//! Owned by a single crawl invocation; nothing here is shared.

use std::collections::{HashSet, VecDeque};

/// A URL waiting to be processed, with its link depth from the seeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: String,
    pub depth: u32,
}

/// FIFO queue of (URL, depth) plus the visited and failed sets
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    failed: Vec<String>,
    seen: HashSet<String>,
    discovered: Vec<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL unless it is already queued or visited
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: String, depth: u32) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        if self.seen.insert(url.clone()) {
            self.discovered.push(url.clone());
        }
        self.queued.insert(url.clone());
        self.queue.push_back(QueuedUrl { url, depth });
        true
    }

    /// Pops the next URL, skipping ones already visited or deeper than `max_depth`
    pub fn next(&mut self, max_depth: u32) -> Option<QueuedUrl> {
        while let Some(entry) = self.queue.pop_front() {
            self.queued.remove(&entry.url);
            if self.visited.contains(&entry.url) || entry.depth > max_depth {
                continue;
            }
            return Some(entry);
        }
        None
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn mark_failed(&mut self, url: &str) {
        self.failed.push(url.to_string());
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// Every URL ever enqueued, in discovery order
    pub fn discovered(&self) -> &[String] {
        &self.discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.enqueue("a".to_string(), 0);
        frontier.enqueue("b".to_string(), 1);
        frontier.enqueue("c".to_string(), 0);

        let order: Vec<_> = std::iter::from_fn(|| frontier.next(5)).map(|q| q.url).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let mut frontier = Frontier::new();
        assert!(frontier.enqueue("a".to_string(), 0));
        assert!(!frontier.enqueue("a".to_string(), 1));
        assert_eq!(frontier.queue_len(), 1);

        let next = frontier.next(5).unwrap();
        frontier.mark_visited(&next.url);
        assert!(!frontier.enqueue("a".to_string(), 2));
        assert!(frontier.next(5).is_none());
    }

    #[test]
    fn test_next_skips_too_deep() {
        let mut frontier = Frontier::new();
        frontier.enqueue("deep".to_string(), 4);
        frontier.enqueue("shallow".to_string(), 1);

        assert_eq!(frontier.next(2).unwrap().url, "shallow");
        assert!(frontier.next(2).is_none());
        assert_eq!(frontier.discovered(), ["deep".to_string(), "shallow".to_string()]);
    }

    #[test]
    fn test_visited_urls_are_not_requeued() {
        let mut frontier = Frontier::new();
        frontier.mark_visited("a");
        frontier.mark_visited("a");
        frontier.mark_visited("b");
        assert_eq!(frontier.visited_count(), 2);
        assert!(!frontier.enqueue("b".to_string(), 0));
        assert_eq!(frontier.queue_len(), 0);
    }
}
