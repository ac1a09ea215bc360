//! Skeleton topology shared by every render.
//!
//! Keypoints carry no labels; their role comes from their position in the frame:
//! `[0, 15)` body, `[15, 36)` left hand, `[36, 57)` right hand.

/// Body landmarks per frame.
pub const POSE_POINTS: usize = 15;

/// Landmarks per hand.
pub const HAND_POINTS: usize = 21;

/// First keypoint index of the left hand.
pub const LEFT_HAND_START: usize = POSE_POINTS;

/// First keypoint index of the right hand.
pub const RIGHT_HAND_START: usize = LEFT_HAND_START + HAND_POINTS;

/// Keypoints consumed from each frame.
pub const KEYPOINTS_PER_FRAME: usize = RIGHT_HAND_START + HAND_POINTS;

/// Body skeleton as pairs of pose keypoint indices.
pub const POSE_CONNECTIONS: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 7],
    [0, 4],
    [4, 5],
    [5, 6],
    [6, 8],
    [9, 10],
    [11, 12],
    [11, 13],
    [12, 14],
];

/// Hand skeleton as pairs of hand keypoint indices, used for both hands.
pub const HAND_CONNECTIONS: [[usize; 2]; 20] = [
    [0, 1], // thumb
    [1, 2],
    [2, 3],
    [3, 4],
    [0, 5], // index
    [5, 6],
    [6, 7],
    [7, 8],
    [5, 9], // middle
    [9, 10],
    [10, 11],
    [11, 12],
    [9, 13], // ring
    [13, 14],
    [14, 15],
    [15, 16],
    [13, 17], // pinky
    [17, 18],
    [18, 19],
    [19, 20],
];

/// Pose keypoint joined to the right hand's root.
pub const RIGHT_WRIST: usize = 14;

/// Pose keypoint joined to the left hand's root.
pub const LEFT_WRIST: usize = 13;

/// Hand keypoint the wrist connectors attach to.
pub const HAND_ROOT: usize = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_layout_adds_up() {
        assert_eq!(LEFT_HAND_START, 15);
        assert_eq!(RIGHT_HAND_START, 36);
        assert_eq!(KEYPOINTS_PER_FRAME, 57);
    }

    #[test]
    fn tables_reference_their_own_segment() {
        assert!(POSE_CONNECTIONS.iter().flatten().all(|&i| i < POSE_POINTS));
        assert!(HAND_CONNECTIONS.iter().flatten().all(|&i| i < HAND_POINTS));
        assert!(RIGHT_WRIST < POSE_POINTS && LEFT_WRIST < POSE_POINTS);
    }

    #[test]
    fn hand_table_is_a_tree_over_all_points() {
        // 21 points joined by 20 edges, every point reachable from the root.
        let mut seen = [false; HAND_POINTS];
        seen[HAND_ROOT] = true;
        for [a, b] in HAND_CONNECTIONS {
            assert!(seen[a], "edge ({a},{b}) starts from an unvisited point");
            seen[b] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
