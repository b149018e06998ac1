//! Buffer pool configuration.

use basalt_common::constants::DEFAULT_POOL_SIZE;

/// Configuration for a buffer pool instance.
///
/// A pool may stand alone or be one of `num_instances` shards of a
/// partitioned pool. Sharded instances split the page-id space by residue
/// class: instance `i` only ever allocates ids congruent to `i` modulo
/// `num_instances`.
#[derive(Debug, Clone)]
pub struct BufferPoolConfig {
    /// Number of page frames owned by this instance.
    pub pool_size: usize,
    /// Total number of pool instances sharing the page-id space.
    pub num_instances: u32,
    /// Index of this instance within the partitioned pool.
    pub instance_index: u32,
}

impl BufferPoolConfig {
    /// Creates a single-instance configuration with the given frame count.
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            num_instances: 1,
            instance_index: 0,
        }
    }

    /// Places this instance within a partitioned pool.
    pub fn with_instances(mut self, num_instances: u32, instance_index: u32) -> Self {
        self.num_instances = num_instances;
        self.instance_index = instance_index;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.pool_size == 0 {
            return Err("pool_size must be > 0");
        }
        if self.num_instances == 0 {
            return Err("num_instances must be > 0");
        }
        if self.instance_index >= self.num_instances {
            return Err("instance_index must be < num_instances");
        }
        Ok(())
    }
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}
