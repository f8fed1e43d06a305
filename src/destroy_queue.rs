//! Destroy Queue — deferred, multi-frame resource destruction.
//!
//! A single undifferentiated stack is split into per-kind sub-queues so no
//! destroyer may touch another destroyer's entries, with frame-counted
//! deferral on top.

/// The destroyer kinds a [`DestroyQueue`] tracks independently. Order here
/// also fixes flush order when multiple kinds are drained together.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DestroyerKind {
    Buffer,
    ImageAndView,
    Sampler,
    Pipeline,
    DescriptorSetLayout,
}

const KINDS: [DestroyerKind; 5] = [
    DestroyerKind::Buffer,
    DestroyerKind::ImageAndView,
    DestroyerKind::Sampler,
    DestroyerKind::Pipeline,
    DestroyerKind::DescriptorSetLayout,
];

type Destroyer = Box<dyn FnOnce() + Send>;

struct SubQueue {
    kind: DestroyerKind,
    // (frame recorded, destroyer)
    entries: Vec<(u64, Destroyer)>,
}

/// Holds destroyers keyed by kind, flushed in reverse-of-insertion order
/// within each kind once enough frames have elapsed.
///
/// A destroyer captures everything it needs (native handles, allocation
/// records) by value, so flushing never needs to consult any live-resource
/// pool — the point of deferral is precisely that the owning pool slot may
/// already have been reused by the time the destroyer runs.
pub struct DestroyQueue {
    sub_queues: Vec<SubQueue>,
}

impl Default for DestroyQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DestroyQueue {
    pub fn new() -> Self {
        Self {
            sub_queues: KINDS
                .iter()
                .map(|&kind| SubQueue {
                    kind,
                    entries: Vec::new(),
                })
                .collect(),
        }
    }

    fn sub_queue_mut(&mut self, kind: DestroyerKind) -> &mut SubQueue {
        self.sub_queues
            .iter_mut()
            .find(|q| q.kind == kind)
            .expect("all DestroyerKind variants are pre-populated in new()")
    }

    /// Enqueues `destroyer` to run no earlier than `current_frame +
    /// frames_in_flight` (checked by [`DestroyQueue::flush_due`]).
    pub fn push<F>(&mut self, kind: DestroyerKind, current_frame: u64, destroyer: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.sub_queue_mut(kind)
            .entries
            .push((current_frame, Box::new(destroyer)));
    }

    /// Runs every destroyer whose deferral window has elapsed as of
    /// `now_frame`, in reverse-of-insertion order within each kind, kind by
    /// kind in declaration order. A destroyer pushed at frame N becomes due
    /// once `now_frame >= N + frames_in_flight`.
    pub fn flush_due(&mut self, now_frame: u64, frames_in_flight: u64) {
        for queue in self.sub_queues.iter_mut() {
            let mut remaining = Vec::with_capacity(queue.entries.len());
            let mut due = Vec::new();
            for entry in queue.entries.drain(..) {
                if now_frame >= entry.0 + frames_in_flight {
                    due.push(entry);
                } else {
                    remaining.push(entry);
                }
            }
            // reverse of insertion order within this kind
            for (_, destroyer) in due.into_iter().rev() {
                destroyer();
            }
            queue.entries = remaining;
        }
    }

    /// Runs every pending destroyer regardless of frame, used on shutdown
    /// after the device has been waited idle.
    pub fn drain_all(&mut self) {
        for queue in self.sub_queues.iter_mut() {
            for (_, destroyer) in queue.entries.drain(..).rev().collect::<Vec<_>>() {
                destroyer();
            }
        }
    }

    pub fn pending_count(&self, kind: DestroyerKind) -> usize {
        self.sub_queues
            .iter()
            .find(|q| q.kind == kind)
            .map(|q| q.entries.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn deferred_until_frames_in_flight_elapsed() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut q = DestroyQueue::new();
        let f = fired.clone();
        q.push(DestroyerKind::Buffer, 10, move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        q.flush_due(10, 2);
        assert_eq!(fired.load(Ordering::SeqCst), 0, "frame N: not yet");
        q.flush_due(11, 2);
        assert_eq!(fired.load(Ordering::SeqCst), 0, "frame N+1: not yet");
        q.flush_due(12, 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1, "frame N+2: due");
    }

    #[test]
    fn flush_order_is_reverse_of_insertion_per_kind() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut q = DestroyQueue::new();
        for i in 0..3 {
            let order = order.clone();
            q.push(DestroyerKind::Buffer, 0, move || order.lock().unwrap().push(i));
        }
        q.flush_due(100, 2);
        assert_eq!(*order.lock().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn kinds_do_not_interfere() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut q = DestroyQueue::new();
        let o1 = order.clone();
        q.push(DestroyerKind::Buffer, 0, move || o1.lock().unwrap().push("buffer"));
        let o2 = order.clone();
        q.push(DestroyerKind::ImageAndView, 0, move || {
            o2.lock().unwrap().push("image")
        });
        q.flush_due(100, 2);
        // buffers flush before images because DestroyerKind::Buffer is
        // declared first in KINDS.
        assert_eq!(*order.lock().unwrap(), vec!["buffer", "image"]);
    }

    #[test]
    fn drain_all_ignores_deferral_window() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut q = DestroyQueue::new();
        let f = fired.clone();
        q.push(DestroyerKind::Pipeline, 1000, move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        q.drain_all();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
