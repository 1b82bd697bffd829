//! Burn Queue
//!
//! Append-only log of burn requests. The bridge never removes or marks a
//! request; relayers page through it and track on their own which
//! sequence numbers they have paid out.

use serde::{Deserialize, Serialize};

use crate::types::{BurnOrder, BurnRequest};

/// Ordered log of burn requests, indexed by sequence number
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BurnQueue {
    requests: Vec<BurnRequest>,
}

impl BurnQueue {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next request will get
    pub fn next_sequence(&self) -> u64 {
        self.requests.len() as u64
    }

    /// Append a request and return it with its sequence number
    pub fn append(&mut self, order: BurnOrder) -> BurnRequest {
        let request = order.into_request(self.next_sequence());
        self.requests.push(request.clone());
        request
    }

    /// Up to `count` oldest requests, ascending
    pub fn oldest(&self, count: usize) -> Vec<BurnRequest> {
        self.requests.iter().take(count).cloned().collect()
    }

    /// Up to `count` requests starting at sequence `start`, ascending
    pub fn from_sequence(&self, start: u64, count: usize) -> Vec<BurnRequest> {
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        self.requests
            .iter()
            .skip(start)
            .take(count)
            .cloned()
            .collect()
    }

    /// Get queue length
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Sequence numbers are exactly 0..len
    pub fn is_dense(&self) -> bool {
        self.requests
            .iter()
            .enumerate()
            .all(|(i, r)| r.sequence == i as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, VariantKey};

    fn order(amount: u128) -> BurnOrder {
        BurnOrder {
            destination_chain: "avax".to_string(),
            variant: VariantKey::base("ordi").unwrap(),
            amount,
            destination_address: "bc1qdest".to_string(),
            wallet: Address::new([1; 20]),
        }
    }

    #[test]
    fn test_append_assigns_dense_sequences() {
        let mut queue = BurnQueue::new();
        assert_eq!(queue.append(order(1)).sequence, 0);
        assert_eq!(queue.append(order(2)).sequence, 1);
        assert_eq!(queue.append(order(3)).sequence, 2);
        assert!(queue.is_dense());
        assert_eq!(queue.next_sequence(), 3);
    }

    #[test]
    fn test_oldest_is_non_destructive() {
        let mut queue = BurnQueue::new();
        for amount in [10, 20, 30] {
            queue.append(order(amount));
        }

        let amounts: Vec<u128> = queue.oldest(10).iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![10, 20, 30]);

        let amounts: Vec<u128> = queue.oldest(2).iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![10, 20]);

        assert_eq!(queue.len(), 3);
        assert!(queue.oldest(0).is_empty());
    }

    #[test]
    fn test_from_sequence_cursor() {
        let mut queue = BurnQueue::new();
        for amount in [10, 20, 30] {
            queue.append(order(amount));
        }

        let page = queue.from_sequence(1, 10);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].sequence, 1);
        assert!(queue.from_sequence(3, 10).is_empty());
        assert!(queue.from_sequence(u64::MAX, 10).is_empty());
        assert_eq!(queue.from_sequence(2, 1)[0].amount, 30);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut queue = BurnQueue::new();
        queue.append(order(u128::MAX));

        let json = serde_json::to_string(&queue).unwrap();
        assert!(json.starts_with('['));
        let back: BurnQueue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, queue);
    }

    #[test]
    fn test_gap_is_not_dense() {
        let mut queue = BurnQueue::new();
        queue.append(order(1));
        let mut tampered = queue.clone();
        tampered.requests[0].sequence = 4;
        assert!(queue.is_dense());
        assert!(!tampered.is_dense());
    }
}
