//! # Render Queue
//!
//! Collects draw calls for one frame.
//!
//! Producers hold a [`DrawSubmitter`], a cheap cloneable sender that can be
//! moved to worker threads. The queue itself is the single consumer: once per
//! frame [`RenderQueue::execute`] drains everything submitted since the last
//! call.

use std::collections::HashSet;

use crossbeam::channel::{unbounded, Receiver, Sender};

use super::DrawCall;

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderQueueStats {
    /// Draw calls drained
    pub draw_calls: usize,
    /// Distinct materials among them
    pub materials: usize,
}

/// Producer side of a [`RenderQueue`]
#[derive(Debug, Clone)]
pub struct DrawSubmitter {
    sender: Sender<DrawCall>,
}

impl DrawSubmitter {
    /// Submit a draw call for the current frame
    ///
    /// Returns `false` if the queue has been dropped; the call is discarded.
    pub fn submit(&self, call: DrawCall) -> bool {
        match self.sender.send(call) {
            Ok(()) => true,
            Err(_) => {
                log::warn!("Render queue is gone; draw call dropped");
                false
            }
        }
    }
}

/// Multi-producer, single-consumer draw call queue
pub struct RenderQueue {
    sender: Sender<DrawCall>,
    receiver: Receiver<DrawCall>,
    last_frame_stats: RenderQueueStats,
}

impl RenderQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            last_frame_stats: RenderQueueStats::default(),
        }
    }

    /// New producer handle
    pub fn submitter(&self) -> DrawSubmitter {
        DrawSubmitter {
            sender: self.sender.clone(),
        }
    }

    /// Number of calls waiting to be drained
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Drain this frame's draw calls in submission order
    pub fn execute(&mut self) -> Vec<DrawCall> {
        let calls: Vec<DrawCall> = self.receiver.try_iter().collect();

        let materials: HashSet<&str> = calls.iter().map(|call| call.material.name()).collect();
        self.last_frame_stats = RenderQueueStats {
            draw_calls: calls.len(),
            materials: materials.len(),
        };
        log::trace!(
            "Render queue drained {} draw call(s), {} material(s)",
            self.last_frame_stats.draw_calls,
            self.last_frame_stats.materials
        );
        calls
    }

    /// Counters from the most recent [`execute`](Self::execute)
    pub fn last_frame_stats(&self) -> RenderQueueStats {
        self.last_frame_stats
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityId;
    use crate::render::{Material, MeshId};
    use std::sync::Arc;
    use std::thread;

    fn call(material: &Arc<Material>, mesh: u32) -> DrawCall {
        DrawCall {
            entity: EntityId::default(),
            mesh: MeshId(mesh),
            material: Arc::clone(material),
            model_matrix: None,
            view_matrix: None,
            light_position: None,
        }
    }

    #[test]
    fn test_render_queue_creation() {
        let mut queue = RenderQueue::new();
        assert_eq!(queue.pending(), 0);
        assert!(queue.execute().is_empty());
        assert_eq!(queue.last_frame_stats(), RenderQueueStats::default());
    }

    #[test]
    fn test_execute_drains_in_order_and_counts_materials() {
        let mut queue = RenderQueue::new();
        let submitter = queue.submitter();
        let rock = Arc::new(Material::new("rock"));
        let ice = Arc::new(Material::new("ice"));

        assert!(submitter.submit(call(&rock, 1)));
        assert!(submitter.submit(call(&ice, 2)));
        assert!(submitter.submit(call(&rock, 3)));

        let drained = queue.execute();
        let meshes: Vec<u32> = drained.iter().map(|c| c.mesh.0).collect();
        assert_eq!(meshes, vec![1, 2, 3]);
        assert_eq!(
            queue.last_frame_stats(),
            RenderQueueStats {
                draw_calls: 3,
                materials: 2
            }
        );
        assert!(queue.execute().is_empty());
    }

    #[test]
    fn test_submit_from_worker_threads() {
        let mut queue = RenderQueue::new();
        let material = Arc::new(Material::new("shared"));

        let workers: Vec<_> = (0..4)
            .map(|index| {
                let submitter = queue.submitter();
                let material = Arc::clone(&material);
                thread::spawn(move || {
                    submitter.submit(call(&material, index));
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(queue.execute().len(), 4);
    }

    #[test]
    fn test_submit_after_queue_dropped() {
        let queue = RenderQueue::new();
        let submitter = queue.submitter();
        drop(queue);

        assert!(!submitter.submit(call(&Arc::new(Material::new("orphan")), 0)));
    }
}
