//! VSOP87D heliocentric ecliptic-of-date series for Earth.
//!
//! Truncated (Meeus, *Astronomical Algorithms*, appendix III). Amplitudes are in
//! radians for L and B and in AU for R; frequencies are radians per Julian millennium.

use crate::planetlib::vsop87::Vsop87Model;
use crate::serieslib::Term;

const L0: &[Term] = &[
    Term::new(1.75347046, 0.0, 0.0),
    Term::new(0.03341656, 4.6692568, 6283.07585),
    Term::new(0.00034894, 4.6261, 12566.1517),
    Term::new(0.00003497, 2.7441, 5753.3849),
    Term::new(0.00003418, 2.8289, 3.5231),
    Term::new(0.00003136, 3.6277, 77713.7715),
    Term::new(0.00002676, 4.4181, 7860.4194),
    Term::new(0.00002343, 6.1352, 3930.2097),
    Term::new(0.00001324, 0.7425, 11506.7698),
    Term::new(0.00001273, 2.0371, 529.691),
    Term::new(0.00001199, 1.1096, 1577.3435),
    Term::new(0.0000099, 5.233, 5884.927),
    Term::new(0.00000902, 2.045, 26.298),
    Term::new(0.00000857, 3.508, 398.149),
    Term::new(0.0000078, 1.179, 5223.694),
    Term::new(0.00000753, 2.533, 5507.553),
    Term::new(0.00000505, 4.583, 18849.228),
    Term::new(0.00000492, 4.205, 775.523),
    Term::new(0.00000357, 2.92, 0.067),
    Term::new(0.00000317, 5.849, 11790.629),
    Term::new(0.00000284, 1.899, 796.298),
    Term::new(0.00000271, 0.315, 10977.079),
    Term::new(0.00000243, 0.345, 5486.778),
    Term::new(0.00000206, 4.806, 2544.314),
    Term::new(0.00000205, 1.869, 5573.143),
    Term::new(0.00000202, 2.458, 6069.777),
    Term::new(0.00000156, 0.833, 213.299),
    Term::new(0.00000132, 3.411, 2942.463),
    Term::new(0.00000126, 1.083, 20.775),
    Term::new(0.00000115, 0.645, 0.98),
    Term::new(0.00000103, 0.636, 4694.003),
    Term::new(0.00000102, 0.976, 15720.839),
    Term::new(0.00000102, 4.267, 7.114),
    Term::new(0.00000099, 6.21, 2146.17),
    Term::new(0.00000098, 0.68, 155.42),
    Term::new(0.00000086, 5.98, 161000.69),
    Term::new(0.00000085, 1.3, 6275.96),
    Term::new(0.00000085, 3.67, 71430.7),
    Term::new(0.0000008, 1.81, 17260.15),
    Term::new(0.00000079, 3.04, 12036.46),
    Term::new(0.00000075, 1.76, 5088.63),
    Term::new(0.00000074, 3.5, 3154.69),
    Term::new(0.00000074, 4.68, 801.82),
    Term::new(0.0000007, 0.83, 9437.76),
    Term::new(0.00000062, 3.98, 8827.39),
    Term::new(0.00000061, 1.82, 7084.9),
    Term::new(0.00000057, 2.78, 6286.6),
    Term::new(0.00000056, 4.39, 14143.5),
    Term::new(0.00000056, 3.47, 6279.55),
    Term::new(0.00000052, 0.19, 12139.55),
    Term::new(0.00000052, 1.33, 1748.02),
    Term::new(0.00000051, 0.28, 5856.48),
    Term::new(0.00000049, 0.49, 1194.45),
    Term::new(0.00000041, 5.37, 8429.24),
    Term::new(0.00000041, 2.4, 19651.05),
    Term::new(0.00000039, 6.17, 10447.39),
    Term::new(0.00000037, 6.04, 10213.29),
    Term::new(0.00000037, 2.57, 1059.38),
    Term::new(0.00000036, 1.71, 2352.87),
    Term::new(0.00000036, 1.78, 6812.77),
    Term::new(0.00000033, 0.59, 17789.85),
    Term::new(0.0000003, 0.44, 83996.85),
    Term::new(0.0000003, 2.74, 1349.87),
    Term::new(0.00000025, 3.16, 4690.48),
];

const L1: &[Term] = &[
    Term::new(6283.31966747, 0.0, 0.0),
    Term::new(0.00206059, 2.678235, 6283.07585),
    Term::new(0.00004303, 2.6351, 12566.1517),
    Term::new(0.00000425, 1.59, 3.523),
    Term::new(0.00000119, 5.796, 26.298),
    Term::new(0.00000109, 2.966, 1577.344),
    Term::new(0.00000093, 2.59, 18849.23),
    Term::new(0.00000072, 1.14, 529.69),
    Term::new(0.00000068, 1.87, 398.15),
    Term::new(0.00000067, 4.41, 5507.55),
    Term::new(0.00000059, 2.89, 5223.69),
    Term::new(0.00000056, 2.17, 155.42),
    Term::new(0.00000045, 0.4, 796.3),
    Term::new(0.00000036, 0.47, 775.52),
    Term::new(0.00000029, 2.65, 7.11),
    Term::new(0.00000021, 5.34, 0.98),
    Term::new(0.00000019, 1.85, 5486.78),
    Term::new(0.00000019, 4.97, 213.3),
    Term::new(0.00000017, 2.99, 6275.96),
    Term::new(0.00000016, 0.03, 2544.31),
    Term::new(0.00000016, 1.43, 2146.17),
    Term::new(0.00000015, 1.21, 10977.08),
    Term::new(0.00000012, 2.83, 1748.02),
    Term::new(0.00000012, 3.26, 5088.63),
    Term::new(0.00000012, 5.27, 1194.45),
    Term::new(0.00000012, 2.08, 4694.0),
    Term::new(0.00000011, 0.77, 553.57),
    Term::new(0.0000001, 1.3, 6286.6),
    Term::new(0.0000001, 4.24, 1349.87),
    Term::new(0.00000009, 2.7, 242.73),
    Term::new(0.00000009, 5.64, 951.72),
    Term::new(0.00000008, 5.3, 2352.87),
    Term::new(0.00000006, 2.65, 9437.76),
    Term::new(0.00000006, 4.67, 4690.48),
];

const L2: &[Term] = &[
    Term::new(0.00052919, 0.0, 0.0),
    Term::new(0.0000872, 1.0721, 6283.0758),
    Term::new(0.00000309, 0.867, 12566.152),
    Term::new(0.00000027, 0.05, 3.52),
    Term::new(0.00000016, 5.19, 26.3),
    Term::new(0.00000016, 3.68, 155.42),
    Term::new(0.0000001, 0.76, 18849.23),
    Term::new(0.00000009, 2.06, 77713.77),
    Term::new(0.00000007, 0.83, 775.52),
    Term::new(0.00000005, 4.66, 1577.34),
    Term::new(0.00000004, 1.03, 7.11),
    Term::new(0.00000004, 3.44, 5573.14),
    Term::new(0.00000003, 5.14, 796.3),
    Term::new(0.00000003, 6.05, 5507.55),
    Term::new(0.00000003, 1.19, 242.73),
    Term::new(0.00000003, 6.12, 529.69),
    Term::new(0.00000003, 0.31, 398.15),
    Term::new(0.00000003, 2.28, 553.57),
    Term::new(0.00000002, 4.38, 5223.69),
    Term::new(0.00000002, 3.75, 0.98),
];

const L3: &[Term] = &[
    Term::new(0.00000289, 5.844, 6283.076),
    Term::new(0.00000035, 0.0, 0.0),
    Term::new(0.00000017, 5.49, 12566.15),
    Term::new(0.00000003, 5.2, 155.42),
    Term::new(0.00000001, 4.72, 3.52),
    Term::new(0.00000001, 5.3, 18849.23),
    Term::new(0.00000001, 5.97, 242.73),
];

const L4: &[Term] = &[
    Term::new(0.00000114, 3.142, 0.0),
    Term::new(0.00000008, 4.13, 6283.08),
    Term::new(0.00000001, 3.84, 12566.15),
];

const L5: &[Term] = &[
    Term::new(0.00000001, 3.14, 0.0),
];

const B0: &[Term] = &[
    Term::new(0.0000028, 3.199, 84334.662),
    Term::new(0.00000102, 5.422, 5507.553),
    Term::new(0.0000008, 3.88, 5223.69),
    Term::new(0.00000044, 3.7, 2352.87),
    Term::new(0.00000032, 4.0, 1577.34),
];

const B1: &[Term] = &[
    Term::new(0.00000009, 3.9, 5507.55),
    Term::new(0.00000006, 1.73, 5223.69),
];

const R0: &[Term] = &[
    Term::new(1.00013989, 0.0, 0.0),
    Term::new(0.016707, 3.0984635, 6283.07585),
    Term::new(0.00013956, 3.05525, 12566.1517),
    Term::new(0.00003084, 5.1985, 77713.7715),
    Term::new(0.00001628, 1.1739, 5753.3849),
    Term::new(0.00001576, 2.8469, 7860.4194),
    Term::new(0.00000925, 5.453, 11506.77),
    Term::new(0.00000542, 4.564, 3930.21),
    Term::new(0.00000472, 3.661, 5884.927),
    Term::new(0.00000346, 0.964, 5507.553),
    Term::new(0.00000329, 5.9, 5223.694),
    Term::new(0.00000307, 0.299, 5573.143),
    Term::new(0.00000243, 4.273, 11790.629),
    Term::new(0.00000212, 5.847, 1577.344),
    Term::new(0.00000186, 5.022, 10977.079),
    Term::new(0.00000175, 3.012, 18849.228),
    Term::new(0.0000011, 5.055, 5486.778),
    Term::new(0.00000098, 0.89, 6069.78),
    Term::new(0.00000086, 5.69, 15720.84),
    Term::new(0.00000086, 1.27, 161000.69),
    Term::new(0.00000065, 0.27, 17260.15),
    Term::new(0.00000063, 0.92, 529.69),
    Term::new(0.00000057, 2.01, 83996.85),
    Term::new(0.00000056, 5.24, 71430.7),
    Term::new(0.00000049, 3.25, 2544.31),
    Term::new(0.00000047, 2.58, 775.52),
    Term::new(0.00000045, 5.54, 9437.76),
    Term::new(0.00000043, 6.01, 6275.96),
    Term::new(0.00000039, 5.36, 4694.0),
    Term::new(0.00000038, 2.39, 8827.39),
    Term::new(0.00000037, 0.83, 19651.05),
    Term::new(0.00000037, 4.9, 12139.55),
    Term::new(0.00000036, 1.67, 12036.46),
    Term::new(0.00000035, 1.84, 2942.46),
    Term::new(0.00000033, 0.24, 7084.9),
    Term::new(0.00000032, 0.18, 5088.63),
    Term::new(0.00000032, 1.78, 398.15),
    Term::new(0.00000028, 1.21, 6286.6),
    Term::new(0.00000028, 1.9, 6279.55),
    Term::new(0.00000026, 4.59, 10447.39),
];

const R1: &[Term] = &[
    Term::new(0.00103019, 1.10749, 6283.07585),
    Term::new(0.00001721, 1.0644, 12566.1517),
    Term::new(0.00000702, 3.142, 0.0),
    Term::new(0.00000032, 1.02, 18849.23),
    Term::new(0.00000031, 2.84, 5507.55),
    Term::new(0.00000025, 1.32, 5223.69),
    Term::new(0.00000018, 1.42, 1577.34),
    Term::new(0.0000001, 5.91, 10977.08),
    Term::new(0.00000009, 1.42, 6275.96),
    Term::new(0.00000009, 0.27, 5486.78),
];

const R2: &[Term] = &[
    Term::new(0.00004359, 5.7846, 6283.0758),
    Term::new(0.00000124, 5.579, 12566.152),
    Term::new(0.00000012, 3.14, 0.0),
    Term::new(0.00000009, 3.63, 77713.77),
    Term::new(0.00000006, 1.87, 5573.14),
    Term::new(0.00000003, 5.47, 18849.23),
];

const R3: &[Term] = &[
    Term::new(0.00000145, 4.273, 6283.076),
    Term::new(0.00000007, 3.92, 12566.15),
];

const R4: &[Term] = &[
    Term::new(0.00000004, 2.56, 6283.08),
];

/// Longitude, latitude and radius power blocks for Earth.
pub(crate) const EARTH: Vsop87Model = Vsop87Model {
    longitude: &[L0, L1, L2, L3, L4, L5],
    latitude: &[B0, B1],
    radius: &[R0, R1, R2, R3, R4],
};
