//! Intrusive ordered containers over caller-owned storage.
//!
//! This crate provides two containers whose per-element bookkeeping lives
//! inside the caller's own records:
//!
//! - [`OrderedTree`] - a height-balanced (AVL) search tree with exact lookup,
//!   successor/predecessor queries and ordered traversal
//! - [`LinkedHeap`] - a min- or max-heap built from linked nodes, supporting
//!   deletion and re-prioritisation of arbitrary members
//!
//! A record embeds a [`TreeNode`] or a [`HeapNode`] (or both) and lives in any
//! [`Storage`]: a slice, an array, a `Vec`, or the bundled [`Arena`]. Nodes are
//! named by [`Handle`]s, and the containers only ever rewire links inside the
//! records. Neither container allocates, copies or drops a record.
//!
//! # Example
//!
//! ```
//! use intrusive_order::{
//!     Arena, Discipline, HeapEntry, HeapNode, LinkedHeap, OrderedTree, TreeEntry, TreeNode,
//! };
//! use core::cmp::Ordering;
//!
//! // One record, two memberships: indexed by id and queued by deadline.
//! struct Request {
//!     by_id: TreeNode,
//!     by_deadline: HeapNode,
//!     id: u32,
//!     deadline: u64,
//! }
//!
//! impl TreeEntry for Request {
//!     fn tree_node(&self) -> &TreeNode { &self.by_id }
//!     fn tree_node_mut(&mut self) -> &mut TreeNode { &mut self.by_id }
//! }
//!
//! impl HeapEntry for Request {
//!     fn heap_node(&self) -> &HeapNode { &self.by_deadline }
//!     fn heap_node_mut(&mut self) -> &mut HeapNode { &mut self.by_deadline }
//! }
//!
//! fn id(request: &Request) -> &u32 { &request.id }
//! fn deadline(a: &Request, b: &Request) -> Ordering { a.deadline.cmp(&b.deadline) }
//!
//! let mut requests = Arena::new();
//! let mut index = OrderedTree::by_key(id);
//! let mut timeouts = LinkedHeap::new(Discipline::Min, deadline);
//!
//! for (id, deadline) in [(7, 300), (3, 100), (5, 200)] {
//!     let handle = requests.alloc(Request {
//!         by_id: TreeNode::new(),
//!         by_deadline: HeapNode::new(),
//!         id,
//!         deadline,
//!     });
//!     index.insert(&mut requests, handle).unwrap();
//!     timeouts.insert(&mut requests, handle).unwrap();
//! }
//!
//! // The earliest deadline expires: drop it from both containers.
//! let expired = timeouts.pop(&mut requests).unwrap();
//! index.remove(&mut requests, expired).unwrap();
//! let request = requests.take(expired).unwrap();
//! assert_eq!(request.id, 3);
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.lookup(&requests, &3), None);
//! assert!(index.lookup(&requests, &5).is_some());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`tracing`** - Emits `trace` events for structural changes and `debug`
//!   events for rejected operations

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod linked_heap;
pub mod ordered_tree;

pub use error::Error;
pub use linked_heap::{Discipline, HeapEntry, HeapNode, LinkedHeap};
pub use ordered_tree::{Direction, OrderedTree, Side, TreeEntry, TreeNode};
pub use raw::{Arena, Handle, Storage};
