//! Historical values compiled into the crate

/// Benefit increases in percent, 1951-2024, by year the increase takes effect
pub(super) const BENEFIT_INCREASES: [f64; 74] = [
    0.0, 12.5, 0.0, 13.0, 0.0, 0.0, 0.0, 0.0, 7.0, 0.0, // 1951-1960
    0.0, 0.0, 0.0, 0.0, 7.0, 0.0, 0.0, 13.0, 0.0, 15.0, // 1961-1970
    10.0, 20.0, 0.0, 11.0, 8.0, 6.4, 5.9, 6.5, 9.9, 14.3, // 1971-1980
    11.2, 7.4, 3.5, 3.5, 3.1, 1.3, 4.2, 4.0, 4.7, 5.4, // 1981-1990
    3.7, 3.0, 2.6, 2.8, 2.6, 2.9, 2.1, 1.3, 2.5, 3.5, // 1991-2000
    2.6, 1.4, 2.1, 2.7, 4.1, 3.3, 2.3, 5.8, 0.0, 0.0, // 2001-2010
    3.6, 1.7, 1.5, 1.7, 0.0, 0.3, 2.0, 2.8, 1.6, 1.3, // 2011-2020
    5.9, 8.7, 3.2, 2.5, // 2021-2024
];

/// National average wage index, 1951-2023
pub(super) const AVERAGE_WAGES: [f64; 73] = [
    2799.16, 2973.32, 3139.44, 3155.64, 3301.44, 3532.36, 3641.72, 3673.80, 3855.80, 4007.12,
    4086.76, 4291.40, 4396.64, 4576.32, 4658.72, 4938.36, 5213.44, 5571.76, 5893.76, 6186.24,
    6497.08, 7133.80, 7580.16, 8030.76, 8630.92, 9226.48, 9779.44, 10556.03, 11479.46, 12513.46,
    13773.10, 14531.34, 15239.24, 16135.07, 16822.51, 17321.82, 18426.51, 19334.04, 20099.55,
    21027.98, 21811.60, 22935.42, 23132.67, 23753.53, 24705.66, 25913.90, 27426.00, 28861.44,
    30469.84, 32154.82, 32921.92, 33252.09, 34064.95, 35648.55, 36952.94, 38651.41, 40405.48,
    41334.97, 40711.61, 41673.83, 42979.61, 44321.67, 44888.16, 46481.52, 48098.63, 48642.15,
    50321.89, 52145.80, 54099.99, 55628.60, 60575.07, 63795.13, 66621.80,
];

/// OASDI contribution and benefit base, 1979-2025
pub(super) const OASDI_BASES_FROM_1979: [f64; 47] = [
    22900.0, 25900.0, 29700.0, 32400.0, 35700.0, 37800.0, 39600.0, 42000.0, 43800.0, 45000.0,
    48000.0, 51300.0, 53400.0, 55500.0, 57600.0, 60600.0, 61200.0, 62700.0, 65400.0, 68400.0,
    72600.0, 76200.0, 80400.0, 84900.0, 87000.0, 87900.0, 90000.0, 94200.0, 97500.0, 102000.0,
    106800.0, 106800.0, 106800.0, 110100.0, 113700.0, 117000.0, 118500.0, 118500.0, 127200.0,
    128400.0, 132900.0, 137700.0, 142800.0, 147000.0, 160200.0, 168600.0, 176100.0,
];

/// Base the wage base would have been without the 1977 amendments, 1979-2025
pub(super) const OLD_LAW_BASES_FROM_1979: [f64; 47] = [
    18900.0, 20400.0, 22200.0, 24300.0, 26700.0, 28200.0, 29700.0, 31500.0, 32700.0, 34800.0,
    36000.0, 38100.0, 39600.0, 41400.0, 42900.0, 45000.0, 45300.0, 46500.0, 48600.0, 50700.0,
    53700.0, 56700.0, 59700.0, 63000.0, 64500.0, 65100.0, 66900.0, 69900.0, 72600.0, 75900.0,
    79200.0, 79200.0, 79200.0, 81900.0, 84300.0, 87000.0, 88200.0, 88200.0, 94500.0, 95400.0,
    98700.0, 102300.0, 106200.0, 109200.0, 118800.0, 125100.0, 130800.0,
];

/// Contribution and benefit base before 1979, as (first year, last year, amount)
pub(super) const BASES_BEFORE_1979: [(i32, i32, f64); 13] = [
    (1937, 1950, 3000.0),
    (1951, 1954, 3600.0),
    (1955, 1958, 4200.0),
    (1959, 1965, 4800.0),
    (1966, 1967, 6600.0),
    (1968, 1971, 7800.0),
    (1972, 1972, 9000.0),
    (1973, 1973, 10800.0),
    (1974, 1974, 13200.0),
    (1975, 1975, 14100.0),
    (1976, 1976, 15300.0),
    (1977, 1977, 16500.0),
    (1978, 1978, 17700.0),
];

/// Legislated HI bases for 1991-1993
pub(super) const HI_BASES_1991_1993: [f64; 3] = [125000.0, 130200.0, 135000.0];

/// Last year of embedded benefit increases
pub(super) const LAST_BENEFIT_INCREASE_YEAR: i32 = 2024;
