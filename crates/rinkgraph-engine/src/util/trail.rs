use glam::Vec3;
use std::collections::VecDeque;

/// Bounded history of recent positions, newest first.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, p: Vec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() >= self.capacity {
            self.points.pop_back();
        }
        self.points.push_front(p);
    }

    pub fn latest(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
