// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Work-Sharing Scheduler
//!
//! A fixed pool of workers pulling [`Task`]s from one priority queue. The
//! task with the largest accepted hypervolume runs first. Workers hand off
//! branches through [`TaskQueue::offer`] only while some worker is idle, so
//! the queue stays short and most of the tree is explored depth-first on
//! the worker that reached it.
//!
//! A push wakes one idle worker and hands the lock straight to it, so a
//! worker that is still busy cannot pop the task first.
//!
//! The pool terminates once the queue is empty and no worker is executing a
//! task: nothing can produce new tasks any more.

use crate::bound::BoundProvider;
use crate::context::SearchContext;
use crate::dispatch::{BranchDispatcher, PendingBranch};
use crate::engine::{BranchEngine, SearchProblem};
use crate::task::Task;
use hssp_hv::oracle::HypervolumeOracle;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PoolPhase {
    /// Tasks are waiting in the queue.
    Running,
    /// The queue is empty but workers may still produce tasks.
    Draining,
    /// The queue is empty and every worker is idle.
    Terminated,
}

#[derive(Debug)]
struct QueueState {
    tasks: BinaryHeap<Task>,
    phase: PoolPhase,
    /// Workers currently executing a task.
    active: usize,
}

#[derive(Debug)]
pub(crate) struct TaskQueue {
    state: Mutex<QueueState>,
    wake: Condvar,
    /// Lock-free copy of `active` for the dispatch decision.
    busy: AtomicUsize,
    workers: usize,
}

impl TaskQueue {
    pub(crate) fn new(workers: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                tasks: BinaryHeap::new(),
                phase: PoolPhase::Draining,
                active: 0,
            }),
            wake: Condvar::new(),
            busy: AtomicUsize::new(0),
            workers,
        }
    }

    pub(crate) fn push(&self, task: Task) {
        let mut state = self.state.lock();
        debug_assert_ne!(state.phase, PoolPhase::Terminated, "task pushed into a terminated pool");
        state.tasks.push(task);
        state.phase = PoolPhase::Running;
        // Notifying under the lock queues the waiter on the mutex itself.
        self.wake.notify_one();
        MutexGuard::unlock_fair(state);
    }

    #[inline]
    pub(crate) fn phase(&self) -> PoolPhase {
        self.state.lock().phase
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Runs the worker loop of one thread until the pool terminates.
    pub(crate) fn work<F>(&self, mut execute: F)
    where
        F: FnMut(Task),
    {
        let mut counted = false;
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.tasks.pop() {
                if !counted {
                    counted = true;
                    let active = state.active + 1;
                    self.set_active(&mut state, active);
                }
                if state.tasks.is_empty() {
                    state.phase = PoolPhase::Draining;
                }
                MutexGuard::unlocked_fair(&mut state, || execute(task));
                continue;
            }

            if state.phase == PoolPhase::Terminated {
                break;
            }
            if counted {
                counted = false;
                let active = state.active - 1;
                self.set_active(&mut state, active);
            }
            if state.active == 0 {
                state.phase = PoolPhase::Terminated;
                self.wake.notify_all();
                break;
            }
            self.wake.wait(&mut state);
        }
    }

    #[inline]
    fn set_active(&self, state: &mut QueueState, active: usize) {
        state.active = active;
        self.busy.store(active, Ordering::Relaxed);
    }
}

impl BranchDispatcher for TaskQueue {
    fn offer(&self, context: &SearchContext, branch: &PendingBranch<'_>) -> bool {
        // Without an incumbent every worker would explore unpruned subtrees.
        if self.workers <= 1 || branch.subset.is_empty() || context.best() <= 0.0 {
            return false;
        }
        if self.busy.load(Ordering::Relaxed) >= self.workers {
            return false;
        }
        self.push(branch.to_task());
        true
    }
}

/// Explores `root` on `context.workers()` threads and returns once the pool
/// has terminated.
pub(crate) fn run_pool(
    problem: &SearchProblem<'_>,
    oracle: &dyn HypervolumeOracle,
    context: &SearchContext,
    bounds: &[Box<dyn BoundProvider>],
    root: Task,
) {
    let workers = context.workers();
    let queue = TaskQueue::new(workers);
    queue.push(root);

    tracing::debug!(workers, "starting search pool");
    std::thread::scope(|scope| {
        for worker in 0..workers {
            let queue = &queue;
            std::thread::Builder::new()
                .name(format!("hssp-worker-{worker}"))
                .spawn_scoped(scope, move || {
                    let _span = tracing::debug_span!("worker", worker).entered();
                    let mut engine =
                        BranchEngine::new(problem, oracle, context, bounds, queue, worker);
                    queue.work(|task| {
                        engine.execute(task);
                        context.on_task_executed();
                    });
                })
                .expect("failed to spawn search worker");
        }
    });
    debug_assert_eq!(queue.phase(), PoolPhase::Terminated);
    tracing::debug!(tasks = context.tasks_executed(), "search pool terminated");
}
