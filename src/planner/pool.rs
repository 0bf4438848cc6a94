//! Explicit worker-capacity pool and the planning service that shares it.
//!
//! Planning itself is a pure offline computation, but when several plans
//! draw workers from one pool, the capacity check and the reservation must
//! happen as a single transaction or two concurrent requests can jointly
//! overcommit. The pool is an explicit value behind a lock, never ambient
//! global state; all mutation goes through `reserve` and `release`.

use crate::planner::plan::{Plan, Planner};
use crate::planner::types::{PlanError, PlannerConfig, Task};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Errors raised by the pool-backed planning service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("insufficient pool capacity: requested {requested}, available {available}")]
    InsufficientCapacity { requested: u32, available: u32 },
}

/// Bounded pool of worker processes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    capacity: u32,
    reserved: u32,
}

impl ResourcePool {
    /// Create a pool with the given total worker capacity
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            reserved: 0,
        }
    }

    /// Total worker capacity of the pool
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Workers currently reserved by plans
    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Workers still available for reservation
    pub fn available(&self) -> u32 {
        self.capacity - self.reserved
    }

    /// Reserve worker units, failing if the pool cannot cover the request.
    ///
    /// The check and the commit are one operation; callers that share the
    /// pool serialize reservations by holding the pool's lock across the
    /// call.
    pub fn reserve(&mut self, units: u32) -> Result<(), ServiceError> {
        if units > self.available() {
            return Err(ServiceError::InsufficientCapacity {
                requested: units,
                available: self.available(),
            });
        }
        self.reserved += units;
        debug!(
            "Reserved {} workers ({}/{} in use)",
            units, self.reserved, self.capacity
        );
        Ok(())
    }

    /// Return previously reserved worker units to the pool
    pub fn release(&mut self, units: u32) {
        self.reserved = self.reserved.saturating_sub(units);
        debug!(
            "Released {} workers ({}/{} in use)",
            units, self.reserved, self.capacity
        );
    }
}

/// Planning service that serializes requests drawing from a shared pool.
///
/// A plan that validates is only admitted if the pool can cover every
/// process it allocates; admission reserves that capacity until the plan is
/// released. Cancelling a request before admission needs no rollback
/// because nothing is reserved until the plan is final.
#[derive(Clone)]
pub struct PlannerService {
    planner: Planner,
    pool: Arc<Mutex<ResourcePool>>,
}

impl PlannerService {
    /// Create a service whose pool holds the config's allocatable capacity
    pub fn new(config: PlannerConfig) -> Result<Self, PlanError> {
        let planner = Planner::new(config)?;
        let pool = ResourcePool::new(planner.config().available_capacity());
        Ok(Self {
            planner,
            pool: Arc::new(Mutex::new(pool)),
        })
    }

    /// Handle to the shared pool
    pub fn pool(&self) -> Arc<Mutex<ResourcePool>> {
        Arc::clone(&self.pool)
    }

    /// Workers currently available in the pool
    pub async fn available(&self) -> u32 {
        self.pool.lock().await.available()
    }

    /// Plan a task set and atomically reserve its worker allocation.
    ///
    /// The planning computation runs outside the lock; only the capacity
    /// check and reservation happen inside it, so concurrent requests
    /// serialize on admission and can never jointly overcommit the pool.
    pub async fn plan_and_reserve(&self, tasks: Vec<Task>) -> Result<Plan, ServiceError> {
        let plan = self.planner.plan(tasks)?;
        let requested = plan_processes(&plan);

        {
            let mut pool = self.pool.lock().await;
            pool.reserve(requested)?;
        }

        info!(
            "Admitted plan {} reserving {} workers",
            plan.metadata.plan_id, requested
        );
        Ok(plan)
    }

    /// Release the worker allocation held by a previously admitted plan
    pub async fn release_plan(&self, plan: &Plan) {
        let units = plan_processes(plan);
        self.pool.lock().await.release(units);
    }
}

/// Total worker processes a plan allocates across its tracks.
fn plan_processes(plan: &Plan) -> u32 {
    plan.execution_plan.iter().map(|step| step.processes).sum()
}
