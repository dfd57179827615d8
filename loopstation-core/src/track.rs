//! Doubly-linked pod tracks.
//!
//! Nodes live in an arena of slots and link to each other through stable
//! [`NodeId`] handles; vacated slots go on a free list and are reused.
//!
//! Insertion side depends on pod class: first-class pods are pushed at the
//! head and economy pods at the tail. That keeps every first-class pod in one
//! run at the head and every economy pod in one run at the tail, which is what
//! [`Track::add_passenger`] relies on when it stops at the first pod of the
//! other class.
use std::fmt;
use thiserror::Error;

use crate::pod::{Pod, PodClass, PodError};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackError {
    #[error("index {index} out of range for track of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error(transparent)]
    Pod(#[from] PodError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(usize);

#[derive(Debug)]
struct Node {
    pod: Pod,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Default)]
pub struct Track {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    size: usize,
}

impl Track {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0 && self.head.is_none() && self.tail.is_none()
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Drop every pod and reset to a fresh track.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.size = 0;
    }

    /// Insert a pod on its class side: first class at the head, economy at the tail.
    pub fn add(&mut self, pod: Pod) {
        match pod.class() {
            PodClass::First => self.push_front(pod),
            PodClass::Economy => self.push_back(pod),
        }
    }

    /// Pod at `index`, counting from the head.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::IndexOutOfRange`] if `index >= size`.
    pub fn get(&self, index: usize) -> Result<Pod, TrackError> {
        let id = self.locate(index)?;
        self.node(id)
            .map(|node| node.pod.clone())
            .ok_or(TrackError::IndexOutOfRange {
                index,
                size: self.size,
            })
    }

    /// Whether this exact pod (by identity) is on the track.
    #[must_use]
    pub fn contains(&self, pod: &Pod) -> bool {
        self.iter().any(|candidate| candidate == pod)
    }

    /// Index of the first pod whose functionality check fails.
    ///
    /// Each pod is checked in order, so the scan itself may break pods.
    #[must_use]
    pub fn find_first_non_functional(&self) -> Option<usize> {
        self.iter().position(|pod| !pod.is_functional())
    }

    /// Unlink and return the first pod whose functionality check fails.
    ///
    /// Checks the same pods, in the same order, as
    /// [`Track::find_first_non_functional`].
    pub fn remove_first_non_functional(&mut self) -> Option<Pod> {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = self.node(id)?;
            if !node.pod.is_functional() {
                return self.unlink(id);
            }
            cursor = node.next;
        }
        None
    }

    /// Unlink and return the pod at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::IndexOutOfRange`] if `index >= size`.
    pub fn remove(&mut self, index: usize) -> Result<Pod, TrackError> {
        let id = self.locate(index)?;
        self.unlink(id).ok_or(TrackError::IndexOutOfRange {
            index,
            size: self.size,
        })
    }

    /// Index of the first pod carrying `name`.
    ///
    /// A pod that reports a malfunction while being searched is skipped.
    #[must_use]
    pub fn find_passenger(&self, name: &str) -> Option<usize> {
        for (index, pod) in self.iter().enumerate() {
            match pod.contains_passenger(name) {
                Ok(true) => return Some(index),
                Ok(false) => {}
                Err(err) => {
                    log::warn!("skipping pod {index} while searching for {name:?}: {err}");
                }
            }
        }
        None
    }

    /// Board `name` into the first pod of `class` with a free seat.
    ///
    /// First class is scanned from the head forward and economy from the tail
    /// backward; either scan stops at the first pod of the other class.
    /// Returns `Ok(false)` when no seat was found.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Pod`] if the chosen pod malfunctions while boarding.
    pub fn add_passenger(
        &self,
        name: impl Into<String>,
        class: PodClass,
    ) -> Result<bool, TrackError> {
        let same_class = |pod: &&Pod| pod.class() == class;
        let has_seat = |pod: &&Pod| !pod.is_full();
        let candidate = match class {
            PodClass::First => self.iter().take_while(same_class).find(has_seat),
            PodClass::Economy => self.iter().rev().take_while(same_class).find(has_seat),
        };
        let Some(pod) = candidate else {
            return Ok(false);
        };
        let name = name.into();
        log::debug!("boarding {name:?} into {} pod", class.label());
        pod.add_passenger(name)?;
        Ok(true)
    }

    #[must_use]
    pub fn first(&self) -> Option<&Pod> {
        self.head.and_then(|id| self.node(id)).map(|node| &node.pod)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Pod> {
        self.tail.and_then(|id| self.node(id)).map(|node| &node.pod)
    }

    /// Walk the links from head to tail; `.rev()` walks tail to head.
    #[must_use]
    pub const fn iter(&self) -> Iter<'_> {
        Iter {
            track: self,
            front: self.head,
            back: self.tail,
        }
    }

    /// Walk the `prev` links from tail to head.
    #[must_use]
    pub fn iter_rev(&self) -> impl Iterator<Item = &Pod> {
        self.iter().rev()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot] = Some(node);
            NodeId(slot)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    fn push_front(&mut self, pod: Pod) {
        let old_head = self.head;
        let id = self.alloc(Node {
            pod,
            prev: None,
            next: old_head,
        });
        match old_head.and_then(|head| self.node_mut(head)) {
            Some(head) => head.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.size += 1;
    }

    fn push_back(&mut self, pod: Pod) {
        let old_tail = self.tail;
        let id = self.alloc(Node {
            pod,
            prev: old_tail,
            next: None,
        });
        match old_tail.and_then(|tail| self.node_mut(tail)) {
            Some(tail) => tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        self.size += 1;
    }

    fn locate(&self, index: usize) -> Result<NodeId, TrackError> {
        let out_of_range = TrackError::IndexOutOfRange {
            index,
            size: self.size,
        };
        if index >= self.size {
            return Err(out_of_range);
        }
        let mut cursor = self.head;
        for _ in 0..index {
            cursor = cursor.and_then(|id| self.node(id)).and_then(|node| node.next);
        }
        cursor.ok_or(out_of_range)
    }

    fn unlink(&mut self, id: NodeId) -> Option<Pod> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        match node.prev.and_then(|prev| self.node_mut(prev)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.node_mut(next)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.size -= 1;
        Some(node.pod)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pod in self {
            writeln!(f, "{pod}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a Pod;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Link-following iterator over a track's pods.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    track: &'a Track,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Pod;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.front?;
        let node = self.track.node(id)?;
        if self.back == Some(id) {
            self.front = None;
            self.back = None;
        } else {
            self.front = node.next;
        }
        Some(&node.pod)
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.back?;
        let node = self.track.node(id)?;
        if self.front == Some(id) {
            self.front = None;
            self.back = None;
        } else {
            self.back = node.prev;
        }
        Some(&node.pod)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(capacity: usize) -> Pod {
        Pod::new(capacity, PodClass::First)
    }

    fn economy(capacity: usize) -> Pod {
        Pod::new(capacity, PodClass::Economy)
    }

    fn assert_links_consistent(track: &Track) {
        assert_eq!(track.iter().count(), track.size());
        assert_eq!(track.iter_rev().count(), track.size());
        assert_eq!(track.is_empty(), track.size() == 0);
        assert_eq!(track.first().is_none(), track.is_empty());
        assert_eq!(track.last().is_none(), track.is_empty());
    }

    #[test]
    fn new_track_is_empty() {
        let track = Track::new();
        assert!(track.is_empty());
        assert_eq!(track.size(), 0);
        assert_eq!(
            track.get(0),
            Err(TrackError::IndexOutOfRange { index: 0, size: 0 })
        );
        assert_links_consistent(&track);
    }

    #[test]
    fn first_class_pods_stack_at_head() {
        let mut track = Track::new();
        let pods: Vec<Pod> = (0..4).map(|_| first(2)).collect();
        for pod in &pods {
            track.add(pod.clone());
        }
        for (index, pod) in pods.iter().rev().enumerate() {
            assert_eq!(&track.get(index).unwrap(), pod);
        }
        assert_links_consistent(&track);
    }

    #[test]
    fn economy_pods_queue_at_tail() {
        let mut track = Track::new();
        let pods: Vec<Pod> = (0..4).map(|_| economy(2)).collect();
        for pod in &pods {
            track.add(pod.clone());
        }
        for (index, pod) in pods.iter().enumerate() {
            assert_eq!(&track.get(index).unwrap(), pod);
        }
    }

    #[test]
    fn mixed_adds_keep_classes_partitioned() {
        let mut track = Track::new();
        let e1 = economy(1);
        let f1 = first(1);
        let e2 = economy(1);
        let f2 = first(1);
        for pod in [&e1, &f1, &e2, &f2] {
            track.add(pod.clone());
        }
        let order: Vec<&Pod> = track.iter().collect();
        assert_eq!(order, vec![&f2, &f1, &e1, &e2]);
        assert_links_consistent(&track);
    }

    #[test]
    fn remove_handles_only_head_tail_and_middle() {
        let mut track = Track::new();
        let only = economy(1);
        track.add(only.clone());
        assert_eq!(track.remove(0).unwrap(), only);
        assert!(track.is_empty());
        assert_links_consistent(&track);

        let pods: Vec<Pod> = (0..5).map(|_| economy(1)).collect();
        for pod in &pods {
            track.add(pod.clone());
        }
        assert_eq!(track.remove(0).unwrap(), pods[0]);
        assert_links_consistent(&track);
        assert_eq!(track.remove(3).unwrap(), pods[4]);
        assert_links_consistent(&track);
        assert_eq!(track.remove(1).unwrap(), pods[2]);
        assert_links_consistent(&track);
        let left: Vec<&Pod> = track.iter().collect();
        assert_eq!(left, vec![&pods[1], &pods[3]]);
        assert_eq!(
            track.remove(2),
            Err(TrackError::IndexOutOfRange { index: 2, size: 2 })
        );
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut track = Track::new();
        for _ in 0..3 {
            track.add(economy(1));
        }
        track.remove(1).unwrap();
        let replacement = first(1);
        track.add(replacement.clone());
        assert_eq!(track.slots.len(), 3);
        assert_eq!(track.first(), Some(&replacement));
        assert_links_consistent(&track);
    }

    #[test]
    fn clear_behaves_like_fresh_track() {
        let mut track = Track::new();
        for _ in 0..3 {
            track.add(first(1));
        }
        track.clear();
        assert!(track.is_empty());
        assert_eq!(track.size(), 0);
        assert!(track.get(0).is_err());
        assert_eq!(track.to_string(), "");
        track.add(economy(1));
        assert_eq!(track.size(), 1);
        assert_links_consistent(&track);
    }

    #[test]
    fn contains_compares_identity() {
        let mut track = Track::new();
        let onboard = first(3);
        let twin = first(3);
        track.add(onboard.clone());
        assert!(track.contains(&onboard));
        assert!(!track.contains(&twin));
    }

    #[test]
    fn find_first_non_functional_reports_earliest() {
        let mut track = Track::new();
        let pods: Vec<Pod> = (0..4).map(|_| economy(1)).collect();
        for pod in &pods {
            track.add(pod.clone());
        }
        assert_eq!(track.find_first_non_functional(), None);
        pods[3].set_non_functional();
        pods[1].set_non_functional();
        assert_eq!(track.find_first_non_functional(), Some(1));
        assert_eq!(Track::new().find_first_non_functional(), None);
    }

    #[test]
    fn iter_rev_walks_tail_to_head() {
        let mut track = Track::new();
        let pods = [first(1), first(2), economy(3), economy(4)];
        for pod in &pods {
            track.add(pod.clone());
        }
        let backward: Vec<&Pod> = track.iter_rev().collect();
        assert_eq!(backward, vec![&pods[3], &pods[2], &pods[0], &pods[1]]);
        assert!(Track::new().iter_rev().next().is_none());
    }

    #[test]
    fn remove_first_non_functional_unlinks_earliest_broken() {
        let mut track = Track::new();
        let pods: Vec<Pod> = (0..4).map(|_| economy(1)).collect();
        for pod in &pods {
            track.add(pod.clone());
        }
        assert_eq!(track.remove_first_non_functional(), None);
        assert_eq!(track.size(), 4);

        pods[3].set_non_functional();
        pods[1].set_non_functional();
        assert_eq!(track.remove_first_non_functional(), Some(pods[1].clone()));
        assert_eq!(track.remove_first_non_functional(), Some(pods[3].clone()));
        assert_eq!(track.remove_first_non_functional(), None);
        assert_eq!(track.size(), 2);
        assert_eq!(track.last(), Some(&pods[2]));
        assert_links_consistent(&track);
    }

    #[test]
    fn find_passenger_skips_broken_pods() {
        let mut track = Track::new();
        let broken = economy(2);
        let working = economy(2);
        broken.add_passenger("Alice").unwrap();
        working.add_passenger("Alice").unwrap();
        track.add(broken.clone());
        track.add(working);
        assert_eq!(track.find_passenger("Alice"), Some(0));
        broken.set_non_functional();
        assert_eq!(track.find_passenger("Alice"), Some(1));
        assert_eq!(track.find_passenger("Bob"), None);
    }

    #[test]
    fn boarding_fills_from_class_end() {
        let mut track = Track::new();
        let f_old = first(1);
        let f_new = first(1);
        let e_old = economy(1);
        let e_new = economy(1);
        for pod in [&f_old, &f_new, &e_old, &e_new] {
            track.add(pod.clone());
        }
        assert!(track.add_passenger("A", PodClass::First).unwrap());
        assert_eq!(f_new.passenger_count(), 1);
        assert!(track.add_passenger("B", PodClass::First).unwrap());
        assert_eq!(f_old.passenger_count(), 1);
        assert!(!track.add_passenger("C", PodClass::First).unwrap());

        assert!(track.add_passenger("D", PodClass::Economy).unwrap());
        assert_eq!(e_new.passenger_count(), 1);
        assert!(track.add_passenger("E", PodClass::Economy).unwrap());
        assert_eq!(e_old.passenger_count(), 1);
        assert!(!track.add_passenger("F", PodClass::Economy).unwrap());
    }

    #[test]
    fn boarding_stops_at_other_class() {
        let mut track = Track::new();
        track.add(economy(5));
        assert!(!track.add_passenger("A", PodClass::First).unwrap());
        assert!(!Track::new().add_passenger("A", PodClass::Economy).unwrap());
    }

    #[test]
    fn boarding_surfaces_malfunction() {
        let mut track = Track::new();
        let pod = first(2);
        track.add(pod.clone());
        pod.set_non_functional();
        assert_eq!(
            track.add_passenger("A", PodClass::First),
            Err(TrackError::Pod(PodError::Malfunctioning))
        );
    }

    #[test]
    fn display_lists_one_pod_per_line() {
        let mut track = Track::new();
        track.add(economy(20));
        track.add(first(10));
        assert_eq!(
            track.to_string(),
            "Pod[class=First, capacity=10, passengers=0]\n\
             Pod[class=Economy, capacity=20, passengers=0]\n"
        );
    }
}
