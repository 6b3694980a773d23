//! Slot to world-tile indexing.
//!
//! Each grid slot keeps its `(x, y)` forever but shows a different world
//! cell as the camera moves. Per axis, slot `i` of `n` shows the unique
//! world index `w` with `w ≡ i (mod n)` and `s <= w < s + n`, where `s` is
//! the floored particle index of the camera. When the camera crosses a
//! particle boundary only the slot that fell off the trailing edge changes
//! its world index, jumping `n` cells ahead; the rest keep theirs.

use glam::DVec2;
use parallax_common::{ceil_div, Axis, SlotIndex, WorldTileAddress};

use crate::scroll::ScrollState;

/// World index shown by `slot` along one axis.
///
/// `scroll_particle_index` may be any integer, including negative ones;
/// the rounding is a true ceiling, not truncation toward zero.
#[must_use]
pub fn world_index(slot: u32, scroll_particle_index: i64, grid_count: u32) -> i64 {
    let count = i64::from(grid_count.max(1));
    let slot = i64::from(slot);
    let wrap_factor = ceil_div(scroll_particle_index - slot, count);
    wrap_factor * count + slot
}

/// World index of `slot` along `axis` for the current scroll state.
#[must_use]
pub fn world_index_along(slot: SlotIndex, state: &ScrollState, axis: Axis) -> i64 {
    world_index(
        slot.along(axis),
        state.particle_index_along(axis),
        state.grid_dims().along(axis),
    )
}

/// World cell currently represented by `slot`.
#[must_use]
pub fn world_tile_address(slot: SlotIndex, state: &ScrollState) -> WorldTileAddress {
    WorldTileAddress::new(
        world_index_along(slot, state, Axis::Horizontal),
        world_index_along(slot, state, Axis::Vertical),
    )
}

/// Screen position of the top-left corner of a world cell.
///
/// Independent of wrapping: large or negative world indices still land at
/// the right place relative to the camera.
#[must_use]
pub fn screen_position(address: WorldTileAddress, state: &ScrollState) -> DVec2 {
    let particle = state.particle_size();
    let scroll = state.scroll_pixels();
    DVec2::new(
        address.x as f64 * f64::from(particle.width) - scroll.x,
        address.y as f64 * f64::from(particle.height) - scroll.y,
    )
}
