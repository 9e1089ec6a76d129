//! The grid engine: one arena, one grid slot, one serialized region.

use grid64_arena::{Arena, ArenaError, Region};
use grid64_codec::codec::read_cells;
use grid64_codec::{encode_into, inspect, Header};
use grid64_core::{Dims, GridError, MetaValue, Metadata, CELL_BYTES};
use tracing::{debug, warn};

use crate::config::{ConfigError, DecodePolicy, EngineConfig};
use crate::reducer;
use crate::serializer::{Serializer, Setup};
use crate::slot::{reshape_in_place, GridSlot, SlotState};

/// A single-slot grid engine.
///
/// Arena layout:
///
/// ```text
/// [0, grid_reserved)                  grid cells (row-major f64)
/// [grid_reserved, +serialized.len)    serialized region, when retained
/// ```
///
/// Offsets and raw pointers derived from the engine are valid until the
/// next call that may reallocate: [`resize`](Self::resize),
/// [`decode`](Self::decode), [`clear_decoded`](Self::clear_decoded) with
/// reclaim, [`stage_serialized`](Self::stage_serialized), and
/// [`set_metadata`](Self::set_metadata). Resize and metadata edits reserve
/// room for the encoding behind the grid, so
/// [`serialize`](Self::serialize) never moves the arena. Compare
/// [`generation`](Self::generation) to detect relocation.
#[derive(Debug)]
pub struct Engine {
    arena: Arena,
    config: EngineConfig,
    slot: GridSlot,
    metadata: Metadata,
    /// Bumped on every metadata change; keys the serializer cache.
    meta_revision: u64,
    /// Bytes reserved for the grid at the start of the arena. Always a
    /// multiple of 8 and always the offset of the serialized region.
    grid_reserved: usize,
    serialized: Option<Region>,
    serializer: Serializer,
}

impl Engine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let arena = Arena::new(config.arena.clone())?;
        Ok(Self {
            arena,
            config,
            slot: GridSlot::default(),
            metadata: Metadata::new(),
            meta_revision: 0,
            grid_reserved: 0,
            serialized: None,
            serializer: Serializer::default(),
        })
    }

    // ── Grid buffer ─────────────────────────────────────────────

    /// Resize the grid to `dims`, returning the arena capacity in bytes.
    ///
    /// From an empty slot every cell is set to `fill`. From a populated
    /// slot, cells inside both the old and the new bounds keep their values
    /// and only new cells take `fill`. Either dimension may be zero.
    ///
    /// Room for the grid's encoding is reserved in the same step, so a
    /// following serialize does not move the cells. Drops the serialized
    /// region. On error nothing changes.
    pub fn resize(&mut self, dims: Dims, fill: f64) -> Result<usize, GridError> {
        let bytes = dims
            .checked_bytes()
            .ok_or_else(|| GridError::InvalidDimensions {
                reason: format!("{dims} overflows the address space"),
            })?;
        let old = self.slot.dims();
        let span = bytes.max(old.count() * CELL_BYTES);
        let setup = Setup::prepare(Header::populated(dims), &self.metadata, self.meta_revision)?;
        self.reserve(span, bytes, setup.len)?;

        let cells = self.arena.f64s_mut(Region::new(0, span))?;
        if self.slot.state.is_populated() {
            reshape_in_place(cells, old, dims, fill);
        } else {
            cells[..dims.count()].fill(fill);
        }

        self.slot.populate(SlotState::Live, dims);
        self.grid_reserved = bytes;
        self.invalidate_serialized();
        self.serializer.store(setup);
        debug!(
            from = %old,
            to = %dims,
            capacity = self.arena.size(),
            generation = self.arena.generation(),
            "grid resized"
        );
        Ok(self.arena.size())
    }

    /// Relabel the dimensions of the held grid without touching its cells.
    ///
    /// `dims` must describe exactly [`data_count`](Self::data_count) cells.
    pub fn set_dims(&mut self, dims: Dims) -> Result<(), GridError> {
        if !self.slot.state.is_populated() {
            return Err(GridError::NoGrid);
        }
        let count = self.data_count();
        if dims.checked_count() != Some(count) {
            return Err(GridError::InvalidDimensions {
                reason: format!("{dims} does not describe {count} cells"),
            });
        }
        self.slot.dims = dims;
        self.invalidate_serialized();
        debug!(dims = %dims, "grid relabelled");
        Ok(())
    }

    /// Number of rows, 0 when unpopulated.
    pub fn height(&self) -> usize {
        self.slot.dims().height
    }

    /// Number of columns, 0 when unpopulated.
    pub fn width(&self) -> usize {
        self.slot.dims().width
    }

    /// Dimensions of the held grid, `0x0` when unpopulated.
    pub fn dims(&self) -> Dims {
        self.slot.dims()
    }

    /// Arena offset of the first cell. The grid always starts at the base.
    pub fn data_offset(&self) -> usize {
        self.arena.base_offset()
    }

    /// Number of cells, `height * width`.
    pub fn data_count(&self) -> usize {
        self.slot.dims().count()
    }

    /// Lifecycle state of the slot.
    pub fn state(&self) -> SlotState {
        self.slot.state
    }

    /// Zero-copy view of the cells, empty when unpopulated.
    pub fn cells(&self) -> &[f64] {
        let region = Region::new(self.data_offset(), self.data_count() * CELL_BYTES);
        self.arena.f64s(region).unwrap_or_default()
    }

    /// Mutable zero-copy view of the cells, empty when unpopulated.
    pub fn cells_mut(&mut self) -> &mut [f64] {
        let region = Region::new(self.data_offset(), self.data_count() * CELL_BYTES);
        self.arena.f64s_mut(region).unwrap_or_default()
    }

    /// Value of cell `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        let idx = self.dims().index(row, col)?;
        self.cells().get(idx).copied()
    }

    // ── Reducer ─────────────────────────────────────────────────

    /// Sum of all cells, or NaN when the slot holds no grid.
    ///
    /// NaN in any cell also yields NaN, so callers cannot tell "no data"
    /// from "poisoned data" through the sum alone; use
    /// [`state`](Self::state) for that.
    pub fn sum(&self) -> f64 {
        if self.slot.state.is_populated() {
            reducer::sum(self.cells())
        } else {
            f64::NAN
        }
    }

    // ── Metadata ────────────────────────────────────────────────

    /// Metadata attached to the grid.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Attach or replace a metadata entry. Drops the serialized region.
    ///
    /// Grows the arena when the larger encoding no longer fits behind the
    /// grid, which may relocate it.
    pub fn set_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetaValue>,
    ) -> Option<MetaValue> {
        let prev = self.metadata.insert(key, value);
        self.touch_metadata();
        let rev = self.meta_revision;
        match Setup::prepare(self.header(), &self.metadata, rev) {
            Ok(setup) => {
                let grid = self.grid_reserved;
                if let Err(e) = self.reserve(grid, grid, setup.len) {
                    warn!(error = %e, "metadata edit left no room for the encoding");
                }
                self.serializer.store(setup);
            }
            Err(e) => warn!(error = %e, "metadata cannot be encoded"),
        }
        prev
    }

    /// Remove a metadata entry. Drops the serialized region if it existed.
    pub fn remove_metadata(&mut self, key: &str) -> Option<MetaValue> {
        let prev = self.metadata.remove(key);
        if prev.is_some() {
            self.touch_metadata();
        }
        prev
    }

    // ── Codec ───────────────────────────────────────────────────

    /// Encode the grid after recomputing setup. Returns the encoded length.
    pub fn serialize_init(&mut self) -> Result<usize, GridError> {
        self.encode(true)
    }

    /// Encode the grid, reusing setup from an earlier call when the
    /// dimensions and metadata are unchanged. Returns the encoded length.
    ///
    /// The bytes are identical to what [`serialize_init`](Self::serialize_init)
    /// would produce. An empty slot encodes to a header-only record.
    pub fn serialize(&mut self) -> Result<usize, GridError> {
        self.encode(false)
    }

    fn encode(&mut self, force_setup: bool) -> Result<usize, GridError> {
        let header = self.header();
        let rev = self.meta_revision;
        let primed = self.serializer.is_primed();
        let cold = force_setup || self.serializer.current(&header, rev).is_none();
        if cold {
            let setup = Setup::prepare(header, &self.metadata, rev)?;
            self.serializer.store(setup);
        }
        let setup = self
            .serializer
            .current(&header, rev)
            .ok_or_else(|| GridError::Internal {
                reason: "serializer setup missing after prepare".into(),
            })?;

        let offset = self.grid_reserved;
        let end = offset
            .checked_add(round_up(setup.len))
            .ok_or(GridError::OutOfMemory {
                requested: usize::MAX,
                limit: self.arena.limit(),
            })?;
        self.arena.ensure_capacity(end)?;

        let count = header.dims.count();
        let (cells, tail) = self.arena.split_cells_mut(offset)?;
        let out = tail.get_mut(..setup.len).ok_or_else(|| out_of_bounds(offset, setup.len))?;
        let cells = cells.get(..count).ok_or_else(|| out_of_bounds(0, count * CELL_BYTES))?;
        let len = encode_into(out, &header, cells, &setup.meta)?;

        self.serialized = Some(Region::new(offset, len));
        debug!(cold, primed, dims = %header.dims, offset, len, "grid serialized");
        Ok(len)
    }

    /// Arena offset of the serialized region, if one is retained.
    pub fn serialized_offset(&self) -> Option<usize> {
        self.serialized.map(|r| r.offset)
    }

    /// Length of the serialized region, 0 when none is retained.
    pub fn serialized_len(&self) -> usize {
        self.serialized.map_or(0, |r| r.len)
    }

    /// Bytes of the serialized region, if one is retained.
    pub fn serialized_bytes(&self) -> Option<&[u8]> {
        self.serialized
            .and_then(|r| self.arena.region_bytes(r).ok())
    }

    /// Reserve a serialized region of `len` bytes for an external producer.
    ///
    /// The returned bytes are zeroed. The next [`decode`](Self::decode)
    /// validates and reads whatever the caller wrote into them.
    pub fn stage_serialized(&mut self, len: usize) -> Result<&mut [u8], GridError> {
        let offset = self.grid_reserved;
        let end = offset
            .checked_add(round_up(len))
            .ok_or(GridError::OutOfMemory {
                requested: usize::MAX,
                limit: self.arena.limit(),
            })?;
        self.arena.ensure_capacity(end)?;
        let region = Region::new(offset, len);
        let bytes = self.arena.region_bytes_mut(region)?;
        bytes.fill(0);
        self.serialized = Some(region);
        debug!(offset, len, "serialized region staged");
        Ok(bytes)
    }

    /// Decode the retained serialized region into the grid slot.
    ///
    /// The encoding must describe exactly `expected` cells. It is validated
    /// in full before anything changes. A grid too large for the space in
    /// front of the serialized region moves the region further up the
    /// arena first. Returns the decoded cell count.
    pub fn decode(&mut self, expected: usize) -> Result<usize, GridError> {
        let Some(region) = self.serialized else {
            warn!("decode rejected: no serialized region");
            return Err(GridError::NothingToDecode);
        };
        let inspected = match inspect(self.arena.region_bytes(region)?) {
            Ok(i) => i,
            Err(e) => {
                warn!(error = %e, "decode rejected: corrupt encoding");
                return Err(GridError::CorruptEncoding {
                    reason: e.to_string(),
                });
            }
        };
        let found = inspected.count();
        if found != expected {
            warn!(expected, found, "decode rejected: count mismatch");
            return Err(GridError::DecodeMismatch { expected, found });
        }
        if self.config.decode_policy == DecodePolicy::RequireCleared
            && self.slot.state.is_populated()
        {
            warn!(state = ?self.slot.state, "decode rejected: slot occupied");
            return Err(GridError::SlotOccupied);
        }

        let needed = found * CELL_BYTES;
        let target = if needed > region.offset {
            let end = needed
                .checked_add(round_up(region.len))
                .ok_or(GridError::OutOfMemory {
                    requested: usize::MAX,
                    limit: self.arena.limit(),
                })?;
            self.arena.ensure_capacity(end)?;
            self.arena.copy_within(region, needed)?;
            debug!(
                from = region.offset,
                to = needed,
                len = region.len,
                generation = self.arena.generation(),
                "serialized region relocated"
            );
            Region::new(needed, region.len)
        } else {
            region
        };

        let (cells, tail) = self.arena.split_cells_mut(target.offset)?;
        let src = tail
            .get(inspected.cells.clone())
            .ok_or_else(|| out_of_bounds(target.offset, inspected.cells.end))?;
        let dst = cells.get_mut(..found).ok_or_else(|| out_of_bounds(0, needed))?;
        read_cells(src, dst)?;

        let header = inspected.header;
        if header.populated {
            self.slot.populate(SlotState::Decoded, header.dims);
        } else {
            self.slot.release();
        }
        self.metadata = inspected.metadata;
        self.meta_revision += 1;
        self.grid_reserved = target.offset;
        self.serialized = Some(target);
        debug!(dims = %header.dims, count = found, "grid decoded");
        Ok(found)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Release the grid slot and its metadata.
    ///
    /// Returns `true` if anything was released, `false` if the slot was
    /// already empty. The serialized region is kept; with
    /// [`reclaim_on_clear`](EngineConfig::reclaim_on_clear) it is moved to
    /// the start of the arena and the arena shrinks to fit it.
    pub fn clear_decoded(&mut self) -> bool {
        let populated = self.slot.state.is_populated();
        if !populated && self.metadata.is_empty() {
            return false;
        }
        let from = self.slot.state;
        if populated {
            self.slot.release();
        }
        if !self.metadata.is_empty() {
            self.metadata.clear();
            self.meta_revision += 1;
        }
        if self.config.reclaim_on_clear {
            if let Err(e) = self.reclaim() {
                warn!(error = %e, "reclaim after clear skipped");
            }
        }
        debug!(from = ?from, capacity = self.arena.size(), "grid slot cleared");
        true
    }

    fn reclaim(&mut self) -> Result<(), ArenaError> {
        let keep = match self.serialized {
            Some(region) => {
                if region.offset > 0 {
                    self.arena.copy_within(region, 0)?;
                    self.serialized = Some(Region::new(0, region.len));
                }
                region.len
            }
            None => 0,
        };
        self.grid_reserved = 0;
        self.arena.shrink_to(keep);
        Ok(())
    }

    // ── Arena ───────────────────────────────────────────────────

    /// Arena size in bytes, including headroom.
    pub fn capacity(&self) -> usize {
        self.arena.size()
    }

    /// Relocation counter of the arena.
    pub fn generation(&self) -> u32 {
        self.arena.generation()
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Base pointer of the arena for the C boundary, null when the arena is
    /// empty. Valid for [`capacity`](Self::capacity) bytes until the next
    /// relocation.
    pub fn base_ptr(&mut self) -> *mut u8 {
        if self.arena.size() == 0 {
            std::ptr::null_mut()
        } else {
            self.arena.as_mut_ptr()
        }
    }

    fn header(&self) -> Header {
        if self.slot.state.is_populated() {
            Header::populated(self.slot.dims)
        } else {
            Header::empty()
        }
    }

    /// Make room for `span` bytes of grid and an encoding of `encoded` bytes
    /// placed at `grid_bytes`.
    ///
    /// Only `span` is required. When the encoding does not fit the arena
    /// limit the grid alone is reserved, and a later serialize reports the
    /// shortage.
    fn reserve(&mut self, span: usize, grid_bytes: usize, encoded: usize) -> Result<(), GridError> {
        let with_encoding = grid_bytes
            .checked_add(round_up(encoded))
            .map(|total| total.max(span));
        if let Some(total) = with_encoding {
            if self.arena.ensure_capacity(total).is_ok() {
                return Ok(());
            }
        }
        debug!(span, encoded, limit = self.arena.limit(), "encoding space not reserved");
        self.arena.ensure_capacity(span)?;
        Ok(())
    }

    fn touch_metadata(&mut self) {
        self.meta_revision += 1;
        self.invalidate_serialized();
    }

    fn invalidate_serialized(&mut self) {
        if self.serialized.take().is_some() {
            debug!("serialized region dropped");
        }
    }
}

fn round_up(bytes: usize) -> usize {
    bytes.div_ceil(CELL_BYTES).saturating_mul(CELL_BYTES)
}

fn out_of_bounds(offset: usize, len: usize) -> GridError {
    GridError::Internal {
        reason: format!("arena region [{offset}, +{len}) out of bounds"),
    }
}
