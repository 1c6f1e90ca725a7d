use bevy::prelude::*;

use crate::track_format::TrackFile;

/// Scene-ready boundary layout for the loaded track. Immutable after
/// startup.
#[derive(Resource)]
pub struct TrackLayout {
    pub posts: Vec<Vec2>,
    pub post_radius: f32,
    pub start_position: Vec2,
    pub start_heading: f32,
}

impl TrackLayout {
    pub fn from_file(file: &TrackFile) -> Self {
        let [x, y] = file.metadata.start_position;
        Self {
            posts: file.boundary_posts_vec2(),
            post_radius: file.metadata.post_radius,
            start_position: Vec2::new(x, y),
            start_heading: file.metadata.start_heading,
        }
    }

    /// Axis-aligned bounds of the post loop as (min, max) corners.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let mut min = self.start_position;
        let mut max = self.start_position;
        for post in &self.posts {
            min = min.min(*post);
            max = max.max(*post);
        }
        (min, max)
    }

    pub fn center(&self) -> Vec2 {
        let (min, max) = self.bounds();
        (min + max) * 0.5
    }

    /// Size of a ground plane that covers the loop with some apron.
    pub fn ground_size(&self) -> Vec2 {
        let (min, max) = self.bounds();
        max - min + Vec2::splat(GROUND_APRON * 2.0)
    }
}

const GROUND_APRON: f32 = 200.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_loop_layout_spans_expected_bounds() {
        let layout = TrackLayout::from_file(&TrackFile::classic_loop());
        let (min, max) = layout.bounds();
        assert_eq!(min, Vec2::new(50.0, 50.0));
        assert_eq!(max, Vec2::new(750.0, 550.0));
        assert_eq!(layout.center(), Vec2::new(400.0, 300.0));
        assert_eq!(layout.posts.len(), 25);
    }

    #[test]
    fn start_pose_sits_inside_the_loop() {
        let layout = TrackLayout::from_file(&TrackFile::classic_loop());
        let (min, max) = layout.bounds();
        assert!(layout.start_position.x > min.x && layout.start_position.x < max.x);
        assert!(layout.start_position.y > min.y && layout.start_position.y < max.y);
        // Clear of every post by more than a car length.
        for post in &layout.posts {
            assert!(layout.start_position.distance(*post) > 50.0);
        }
    }

    #[test]
    fn ground_plane_covers_the_loop() {
        let layout = TrackLayout::from_file(&TrackFile::classic_loop());
        let size = layout.ground_size();
        assert!(size.x >= 700.0 && size.y >= 500.0);
    }
}
