//! Built-in glyph bitmaps (7 columns by 9 rows).
//!
//! `#` marks a lit texel, `.` an empty one.

pub const DIGITS: [[&str; 9]; 10] = [
    // 0
    [
        ".#####.", "##...##", "##..###", "##.#.##", "###..##", "##...##", "##...##", "##...##",
        ".#####.",
    ],
    // 1
    [
        "...##..", "..###..", ".####..", "...##..", "...##..", "...##..", "...##..", "...##..",
        ".######",
    ],
    // 2
    [
        ".#####.", "##...##", ".....##", "....##.", "...##..", "..##...", ".##....", "##.....",
        "#######",
    ],
    // 3
    [
        ".#####.", "##...##", ".....##", ".....##", "..####.", ".....##", ".....##", "##...##",
        ".#####.",
    ],
    // 4
    [
        "....##.", "...###.", "..####.", ".##.##.", "##..##.", "#######", "....##.", "....##.",
        "....##.",
    ],
    // 5
    [
        "#######", "##.....", "##.....", "######.", ".....##", ".....##", ".....##", "##...##",
        ".#####.",
    ],
    // 6
    [
        "..####.", ".##....", "##.....", "######.", "##...##", "##...##", "##...##", "##...##",
        ".#####.",
    ],
    // 7
    [
        "#######", ".....##", "....##.", "...##..", "..##...", "..##...", "..##...", "..##...",
        "..##...",
    ],
    // 8
    [
        ".#####.", "##...##", "##...##", "##...##", ".#####.", "##...##", "##...##", "##...##",
        ".#####.",
    ],
    // 9
    [
        ".#####.", "##...##", "##...##", "##...##", ".######", ".....##", ".....##", "....##.",
        ".####..",
    ],
];

/// Colon separator (3 columns by 9 rows).
pub const COLON: [&str; 9] = [
    "...", "...", ".#.", "###", ".#.", "...", ".#.", "###", ".#.",
];
