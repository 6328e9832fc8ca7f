// src/config/consts.rs

// Grid source
pub const DEFAULT_GRID_FILE: &str = "school_schedule.csv";
pub const DEFAULT_CONFIG_FILE: &str = "schedule.toml";
pub const GRID_SEP: char = ',';

// Local log
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Cache
pub const CACHE_TTL_SECS: u64 = 5 * 60;

// Day banners, in week order. Each entry lists the accepted spellings
// ("расписание на пятницу" uses the accusative).
pub const DAY_NAMES: [&[&str]; 6] = [
    &["ПОНЕДЕЛЬНИК", "MONDAY"],
    &["ВТОРНИК", "TUESDAY"],
    &["СРЕДА", "СРЕДУ", "WEDNESDAY"],
    &["ЧЕТВЕРГ", "THURSDAY"],
    &["ПЯТНИЦА", "ПЯТНИЦУ", "FRIDAY"],
    &["СУББОТА", "СУББОТУ", "SATURDAY"],
];

// Banner rows carry the day name and little else.
pub const DAY_BANNER_MAX_CELLS: usize = 2;

// Header token that opens a lesson table.
pub const TABLE_START_TOKENS: [&str; 2] = ["ВРЕМЯ", "TIME"];

// Shift banners (matched on normalized row text).
pub const SECOND_SHIFT_MARKERS: [&str; 5] =
    ["2 СМЕНА", "II СМЕНА", "ВТОРАЯ СМЕНА", "2-Я СМЕНА", "SECOND SHIFT"];
pub const FIRST_SHIFT_MARKERS: [&str; 5] =
    ["1 СМЕНА", "I СМЕНА", "ПЕРВАЯ СМЕНА", "1-Я СМЕНА", "FIRST SHIFT"];

// Segmenter bounds
pub const TABLE_SCAN_ROWS: usize = 100;
pub const SHIFT_LOOKBACK_ROWS: usize = 10;
pub const MIN_TABLE_GAP_ROWS: usize = 5;
pub const HEADER_BACKTRACK_ROWS: usize = 2;

// Assembler bounds
pub const LESSON_SCAN_ROWS: usize = 50;
pub const LABEL_GRACE_ROWS: usize = 2;

// Time parsing
pub const LESSON_MINUTES: u32 = 45;

// Rendering
pub const SELF_STUDY_ROOM: &str = "ДЕНЬ САМОПОДГОТОВКИ";
