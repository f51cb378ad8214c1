//! Piece-square tables, written from Red's side of the board.
//!
//! Row 0 is the far edge from Red's palace. Black reads the tables with rows
//! flipped. Kinds without a table get no positional bonus.

pub const SOLDIER_PST: [[i32; 9]; 10] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [90, 90, 110, 120, 120, 120, 110, 90, 90],
    [90, 90, 110, 120, 120, 120, 110, 90, 90],
    [70, 90, 100, 110, 110, 110, 100, 90, 70],
    [70, 70, 70, 70, 70, 70, 70, 70, 70],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
];

pub const HORSE_PST: [[i32; 9]; 10] = [
    [40, 60, 60, 60, 40, 60, 60, 60, 40],
    [60, 80, 100, 100, 80, 100, 100, 80, 60],
    [60, 100, 110, 120, 100, 120, 110, 100, 60],
    [60, 100, 110, 120, 100, 120, 110, 100, 60],
    [60, 80, 110, 110, 100, 110, 110, 80, 60],
    [60, 80, 110, 110, 100, 110, 110, 80, 60],
    [60, 100, 110, 110, 100, 110, 110, 100, 60],
    [40, 60, 80, 80, 80, 80, 80, 60, 40],
    [20, 40, 60, 60, 60, 60, 60, 40, 20],
    [0, 20, 40, 40, 40, 40, 40, 20, 0],
];

pub const CHARIOT_PST: [[i32; 9]; 10] = [
    [140, 140, 120, 140, 140, 140, 120, 140, 140],
    [140, 160, 160, 160, 160, 160, 160, 160, 140],
    [110, 130, 130, 130, 130, 130, 130, 130, 110],
    [140, 160, 160, 160, 160, 160, 160, 160, 140],
    [110, 130, 130, 130, 130, 130, 130, 130, 110],
    [110, 130, 130, 130, 130, 130, 130, 130, 110],
    [110, 120, 120, 120, 120, 120, 120, 120, 110],
    [100, 110, 110, 110, 110, 110, 110, 110, 100],
    [120, 140, 140, 160, 140, 160, 140, 140, 120],
    [100, 120, 120, 120, 120, 120, 120, 120, 100],
];
