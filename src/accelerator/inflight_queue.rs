/// # Description
/// the bounded fifo of completion cycles for layers that occupy the pim pipeline
/// * a fixed ring buffer, the capacity is the sequencer fifo depth
/// * entries are only removed from the front, and only once the host clock reached them
/// * `max_occupancy` remembers the high water mark of the run
#[derive(Debug, Clone)]
pub struct InflightQueue {
    slots: Vec<u64>,
    head: usize,
    len: usize,
    max_occupancy: usize,
}

impl InflightQueue {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "inflight queue needs at least one slot");
        InflightQueue {
            slots: vec![0; capacity],
            head: 0,
            len: 0,
            max_occupancy: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }
    pub fn max_occupancy(&self) -> usize {
        self.max_occupancy
    }

    /// the oldest completion cycle still in flight
    pub fn earliest(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.slots[self.head])
        }
    }

    /// # Description
    /// append a completion cycle at the back
    /// # Panics
    /// - when the queue is full, the caller must drain or stall first
    pub fn push(&mut self, finish: u64) {
        assert!(!self.is_full(), "push into a full inflight queue");
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = finish;
        self.len += 1;
        self.max_occupancy = self.max_occupancy.max(self.len);
    }

    /// # Description
    /// pop every entry from the front whose completion cycle is `<= now`
    /// * stops at the first entry still in the future, even if later ones are done
    /// # Return
    /// the number of retired entries
    ///
    /// # Example
    /// ```
    /// use pim_ctrl::accelerator::InflightQueue;
    /// let mut queue = InflightQueue::new(4);
    /// queue.push(10);
    /// queue.push(30);
    /// queue.push(20);
    /// assert_eq!(queue.drain_until(25), 1);
    /// assert_eq!(queue.earliest(), Some(30));
    /// ```
    pub fn drain_until(&mut self, now: u64) -> usize {
        let mut retired = 0;
        while let Some(finish) = self.earliest() {
            if finish > now {
                break;
            }
            self.head = (self.head + 1) % self.slots.len();
            self.len -= 1;
            retired += 1;
        }
        retired
    }
}
