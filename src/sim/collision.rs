//! Axis-aligned collision between the player and falling enemies
//!
//! Screen coordinates: x grows rightward, y grows downward, so an enemy's
//! "lower edge" is its largest y.

use glam::Vec2;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Box of the given size centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            left: center.x - half.x,
            right: center.x + half.x,
            top: center.y - half.y,
            bottom: center.y + half.y,
        }
    }

    /// Box of the given size standing on `foot` (horizontal center, bottom edge)
    pub fn from_foot(foot: Vec2, size: Vec2) -> Self {
        Self {
            left: foot.x - size.x / 2.0,
            right: foot.x + size.x / 2.0,
            top: foot.y - size.y,
            bottom: foot.y,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Closed-interval overlap of the horizontal ranges
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left <= other.right && other.left <= self.right
    }

    /// Whether a point lies inside (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Whether a falling enemy has struck the player.
///
/// True when the horizontal ranges overlap and the enemy's lower edge has
/// reached or passed the player's upper edge.
pub fn enemy_hits_player(enemy: &Aabb, player: &Aabb) -> bool {
    enemy.overlaps_x(player) && enemy.bottom >= player.top
}
