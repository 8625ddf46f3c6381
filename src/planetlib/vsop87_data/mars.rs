//! VSOP87D heliocentric ecliptic-of-date series for Mars.
//!
//! Truncated (Meeus, *Astronomical Algorithms*, appendix III). Amplitudes are in
//! radians for L and B and in AU for R; frequencies are radians per Julian millennium.

use crate::planetlib::vsop87::Vsop87Model;
use crate::serieslib::Term;

const L0: &[Term] = &[
    Term::new(6.20347712, 0.0, 0.0),
    Term::new(0.18656368, 5.050371, 3340.6124267),
    Term::new(0.01108217, 5.4009984, 6681.2248534),
    Term::new(0.00091798, 5.75479, 10021.83728),
    Term::new(0.00027745, 5.9705, 3.52312),
    Term::new(0.00012316, 0.84956, 2810.92146),
    Term::new(0.0001061, 2.93959, 2281.2305),
    Term::new(0.00008927, 4.157, 0.0173),
    Term::new(0.00008716, 6.1101, 13362.4497),
    Term::new(0.00007775, 3.3397, 5621.8429),
    Term::new(0.00006798, 0.3646, 398.149),
    Term::new(0.00004161, 0.2281, 2942.4634),
    Term::new(0.00003575, 1.6619, 2544.3144),
    Term::new(0.00003075, 0.857, 191.4483),
    Term::new(0.00002938, 6.0789, 0.0673),
    Term::new(0.00002628, 0.6481, 3337.0893),
    Term::new(0.0000258, 0.03, 3344.1355),
    Term::new(0.00002389, 5.039, 796.298),
    Term::new(0.00001799, 0.6563, 529.691),
    Term::new(0.00001546, 2.9158, 1751.5395),
    Term::new(0.00001528, 1.1498, 6151.5339),
    Term::new(0.00001286, 3.068, 2146.1654),
    Term::new(0.00001264, 3.6228, 5092.152),
    Term::new(0.00001025, 3.6933, 8962.4553),
    Term::new(0.00000892, 0.183, 16703.062),
    Term::new(0.00000859, 2.401, 2914.014),
    Term::new(0.00000833, 4.495, 3340.63),
    Term::new(0.00000833, 2.464, 3340.595),
    Term::new(0.00000749, 3.822, 155.42),
    Term::new(0.00000724, 0.675, 3738.761),
    Term::new(0.00000713, 3.663, 1059.382),
    Term::new(0.00000655, 0.489, 3127.313),
    Term::new(0.00000636, 2.922, 8432.764),
    Term::new(0.00000553, 4.475, 1748.016),
    Term::new(0.0000055, 3.81, 0.98),
    Term::new(0.00000472, 3.625, 1194.447),
    Term::new(0.00000426, 0.554, 6283.076),
    Term::new(0.00000415, 0.497, 213.299),
    Term::new(0.00000312, 0.999, 6677.702),
    Term::new(0.00000307, 0.381, 6684.748),
    Term::new(0.00000302, 4.486, 3532.061),
    Term::new(0.00000299, 2.783, 6254.627),
    Term::new(0.00000293, 4.221, 20.775),
    Term::new(0.00000284, 5.769, 3149.164),
    Term::new(0.00000281, 5.882, 1349.867),
    Term::new(0.00000274, 0.542, 3340.545),
    Term::new(0.00000274, 0.134, 3340.68),
    Term::new(0.00000239, 5.372, 4136.91),
    Term::new(0.00000236, 5.755, 3333.499),
    Term::new(0.00000231, 1.282, 3870.303),
    Term::new(0.00000221, 3.505, 382.897),
    Term::new(0.00000204, 2.821, 1221.849),
    Term::new(0.00000193, 3.357, 3.59),
    Term::new(0.00000189, 1.491, 9492.146),
    Term::new(0.00000179, 1.006, 951.718),
    Term::new(0.00000174, 2.414, 553.569),
    Term::new(0.00000172, 0.439, 5486.778),
    Term::new(0.0000016, 3.949, 4562.461),
    Term::new(0.00000144, 1.419, 135.065),
    Term::new(0.0000014, 3.326, 2700.715),
    Term::new(0.00000138, 4.301, 7.114),
    Term::new(0.00000131, 4.045, 12303.068),
    Term::new(0.00000128, 2.208, 1592.596),
    Term::new(0.00000128, 1.807, 5088.629),
    Term::new(0.00000117, 3.128, 7903.073),
    Term::new(0.00000113, 3.701, 1589.073),
    Term::new(0.0000011, 1.052, 242.729),
    Term::new(0.00000105, 0.785, 8827.39),
    Term::new(0.000001, 3.243, 11773.377),
];

const L1: &[Term] = &[
    Term::new(3340.85627474, 0.0, 0.0),
    Term::new(0.01458227, 3.6042605, 3340.6124267),
    Term::new(0.00164901, 3.926313, 6681.224853),
    Term::new(0.00019963, 4.26594, 10021.83728),
    Term::new(0.00003452, 4.7321, 3.5231),
    Term::new(0.00002485, 4.6128, 13362.4497),
    Term::new(0.00000842, 4.459, 2281.23),
    Term::new(0.00000538, 5.016, 398.149),
    Term::new(0.00000521, 4.994, 3344.136),
    Term::new(0.00000433, 2.561, 191.448),
    Term::new(0.0000043, 5.316, 155.42),
    Term::new(0.00000382, 3.539, 796.298),
    Term::new(0.00000314, 4.963, 16703.062),
    Term::new(0.00000283, 3.16, 2544.314),
    Term::new(0.00000206, 4.569, 2146.165),
    Term::new(0.00000169, 1.329, 3337.089),
    Term::new(0.00000158, 4.185, 1751.54),
    Term::new(0.00000134, 2.233, 0.98),
    Term::new(0.00000134, 5.974, 1748.016),
    Term::new(0.00000118, 6.024, 6151.534),
    Term::new(0.00000117, 2.213, 1059.382),
    Term::new(0.00000114, 2.129, 1194.447),
    Term::new(0.00000114, 5.428, 3738.761),
    Term::new(0.00000091, 1.1, 1349.87),
    Term::new(0.00000085, 3.91, 553.57),
    Term::new(0.00000083, 5.3, 6684.75),
    Term::new(0.00000081, 4.43, 529.69),
    Term::new(0.0000008, 2.25, 8962.46),
    Term::new(0.00000073, 2.5, 951.72),
    Term::new(0.00000073, 5.84, 242.73),
    Term::new(0.00000071, 3.86, 2914.01),
    Term::new(0.00000068, 5.02, 382.9),
    Term::new(0.00000065, 1.02, 3340.6),
    Term::new(0.00000065, 3.05, 3340.63),
    Term::new(0.00000062, 4.15, 3149.16),
    Term::new(0.00000057, 3.89, 4136.91),
    Term::new(0.00000048, 4.87, 213.3),
    Term::new(0.00000048, 1.18, 3333.5),
    Term::new(0.00000047, 1.31, 3185.19),
    Term::new(0.00000041, 0.71, 1592.6),
    Term::new(0.0000004, 2.73, 7.11),
    Term::new(0.0000004, 5.32, 20043.67),
    Term::new(0.00000033, 5.41, 6283.08),
    Term::new(0.00000028, 0.05, 9492.15),
    Term::new(0.00000027, 3.89, 1221.85),
    Term::new(0.00000027, 5.11, 2700.72),
];

const L2: &[Term] = &[
    Term::new(0.00058016, 2.04979, 3340.61243),
    Term::new(0.00054188, 0.0, 0.0),
    Term::new(0.00013908, 2.45742, 6681.22485),
    Term::new(0.00002465, 2.8, 10021.8373),
    Term::new(0.00000398, 3.141, 13362.45),
    Term::new(0.00000222, 3.194, 3.523),
    Term::new(0.00000121, 0.543, 155.42),
    Term::new(0.00000062, 3.49, 16703.06),
    Term::new(0.00000054, 3.54, 3344.14),
    Term::new(0.00000034, 6.0, 2281.23),
    Term::new(0.00000032, 4.14, 191.45),
    Term::new(0.0000003, 2.0, 796.3),
    Term::new(0.00000023, 4.33, 242.73),
    Term::new(0.00000022, 3.45, 398.15),
    Term::new(0.0000002, 5.42, 553.57),
    Term::new(0.00000016, 0.66, 0.98),
    Term::new(0.00000016, 6.11, 2146.17),
    Term::new(0.00000016, 1.22, 1748.02),
    Term::new(0.00000015, 6.1, 3185.19),
    Term::new(0.00000014, 4.02, 951.72),
    Term::new(0.00000014, 2.62, 1349.87),
    Term::new(0.00000013, 0.6, 1194.45),
    Term::new(0.00000012, 3.86, 6684.75),
    Term::new(0.00000011, 4.72, 2544.31),
    Term::new(0.0000001, 0.25, 382.9),
    Term::new(0.00000009, 0.68, 1059.38),
    Term::new(0.00000009, 3.83, 20043.67),
    Term::new(0.00000009, 3.88, 3738.76),
    Term::new(0.00000008, 5.46, 1751.54),
    Term::new(0.00000007, 2.58, 3149.16),
    Term::new(0.00000007, 2.38, 4136.91),
    Term::new(0.00000006, 5.48, 1592.6),
    Term::new(0.00000006, 2.34, 3097.88),
];

const L3: &[Term] = &[
    Term::new(0.00001482, 0.4443, 3340.6124),
    Term::new(0.00000662, 0.885, 6681.225),
    Term::new(0.00000188, 1.288, 10021.837),
    Term::new(0.00000041, 1.65, 13362.45),
    Term::new(0.00000026, 0.0, 0.0),
    Term::new(0.00000023, 2.05, 155.42),
    Term::new(0.0000001, 1.58, 3.52),
    Term::new(0.00000008, 2.0, 16703.06),
    Term::new(0.00000005, 2.82, 242.73),
    Term::new(0.00000004, 2.02, 3344.14),
    Term::new(0.00000003, 4.59, 3185.19),
    Term::new(0.00000003, 0.65, 553.57),
];

const L4: &[Term] = &[
    Term::new(0.00000114, 3.1416, 0.0),
    Term::new(0.00000029, 5.64, 6681.22),
    Term::new(0.00000024, 5.14, 3340.61),
    Term::new(0.00000011, 6.03, 10021.84),
    Term::new(0.00000003, 0.13, 13362.45),
    Term::new(0.00000003, 3.56, 155.42),
    Term::new(0.00000001, 0.49, 16703.06),
    Term::new(0.00000001, 1.32, 242.73),
];

const L5: &[Term] = &[
    Term::new(0.00000001, 3.14, 0.0),
    Term::new(0.00000001, 4.04, 6681.22),
];

const B0: &[Term] = &[
    Term::new(0.03197135, 3.7683204, 3340.6124267),
    Term::new(0.00298033, 4.10617, 6681.224853),
    Term::new(0.00289105, 0.0, 0.0),
    Term::new(0.00031366, 4.44651, 10021.83728),
    Term::new(0.00003484, 4.7881, 13362.4497),
    Term::new(0.00000443, 5.026, 3344.136),
    Term::new(0.00000443, 5.652, 3337.089),
    Term::new(0.00000399, 5.131, 16703.062),
    Term::new(0.00000293, 3.793, 2281.23),
    Term::new(0.00000182, 6.136, 6151.534),
    Term::new(0.00000163, 4.264, 529.691),
    Term::new(0.0000016, 2.232, 1059.382),
    Term::new(0.00000149, 2.165, 5621.843),
    Term::new(0.00000143, 1.182, 3340.595),
    Term::new(0.00000143, 3.213, 3340.63),
    Term::new(0.00000139, 2.418, 8962.455),
];

const B1: &[Term] = &[
    Term::new(0.00350069, 5.368478, 3340.612427),
    Term::new(0.00014116, 3.14159, 0.0),
    Term::new(0.00009671, 5.4788, 6681.2249),
    Term::new(0.00001472, 3.2021, 10021.8373),
    Term::new(0.00000426, 3.408, 13362.45),
    Term::new(0.00000102, 0.776, 3337.089),
    Term::new(0.00000079, 3.72, 16703.06),
    Term::new(0.00000033, 3.46, 5621.84),
    Term::new(0.00000026, 2.48, 2281.23),
];

const B2: &[Term] = &[
    Term::new(0.00016727, 0.60221, 3340.61243),
    Term::new(0.00004987, 3.1416, 0.0),
    Term::new(0.00000302, 5.559, 6681.225),
    Term::new(0.00000026, 1.9, 13362.45),
    Term::new(0.00000021, 0.92, 10021.84),
    Term::new(0.00000012, 2.24, 3340.6),
    Term::new(0.00000008, 2.25, 16703.06),
];

const B3: &[Term] = &[
    Term::new(0.00000607, 1.981, 3340.612),
    Term::new(0.00000043, 0.0, 0.0),
    Term::new(0.00000014, 1.8, 6681.22),
    Term::new(0.00000003, 3.45, 10021.84),
];

const B4: &[Term] = &[
    Term::new(0.00000013, 0.0, 0.0),
    Term::new(0.00000011, 3.46, 3340.61),
    Term::new(0.00000001, 0.5, 6681.22),
];

const R0: &[Term] = &[
    Term::new(1.53033488, 0.0, 0.0),
    Term::new(0.14184953, 3.47971284, 3340.6124267),
    Term::new(0.00660776, 3.817834, 6681.224853),
    Term::new(0.00046179, 4.15595, 10021.83728),
    Term::new(0.0000811, 5.5596, 2810.9215),
    Term::new(0.00007485, 1.7724, 5621.8429),
    Term::new(0.00005523, 1.3644, 2281.2305),
    Term::new(0.00003825, 4.4941, 13362.4497),
    Term::new(0.00002484, 4.9255, 2942.4634),
    Term::new(0.00002307, 0.0908, 2544.3144),
    Term::new(0.00001999, 5.3606, 3337.0893),
    Term::new(0.0000196, 4.7425, 3344.1355),
    Term::new(0.00001167, 2.1126, 5092.152),
    Term::new(0.00001103, 5.0091, 398.149),
    Term::new(0.00000992, 5.839, 6151.534),
    Term::new(0.00000899, 4.408, 529.691),
    Term::new(0.00000807, 2.102, 1059.382),
    Term::new(0.00000798, 3.448, 796.298),
    Term::new(0.00000741, 1.499, 2146.165),
    Term::new(0.00000726, 1.245, 8432.764),
    Term::new(0.00000692, 2.134, 8962.455),
    Term::new(0.00000633, 0.894, 3340.595),
    Term::new(0.00000633, 2.924, 3340.63),
    Term::new(0.0000063, 1.287, 1751.54),
    Term::new(0.00000574, 0.829, 2914.014),
    Term::new(0.00000526, 5.383, 3738.761),
    Term::new(0.00000473, 5.199, 3127.313),
    Term::new(0.00000348, 4.832, 16703.062),
    Term::new(0.00000284, 2.907, 3532.061),
    Term::new(0.0000028, 5.257, 6283.076),
    Term::new(0.00000276, 1.218, 6254.627),
    Term::new(0.00000275, 2.908, 1748.016),
    Term::new(0.0000027, 3.764, 5884.927),
    Term::new(0.00000239, 2.037, 1194.447),
    Term::new(0.00000234, 5.105, 5486.778),
    Term::new(0.00000228, 3.255, 6872.673),
    Term::new(0.00000223, 4.199, 3149.164),
    Term::new(0.00000219, 5.583, 191.448),
    Term::new(0.00000208, 5.255, 3340.545),
    Term::new(0.00000208, 4.846, 3340.68),
    Term::new(0.00000186, 5.699, 6677.702),
    Term::new(0.00000183, 5.081, 6684.748),
    Term::new(0.00000179, 4.184, 3333.499),
    Term::new(0.00000176, 5.953, 3870.303),
    Term::new(0.00000164, 3.799, 4136.91),
];

const R1: &[Term] = &[
    Term::new(0.01107433, 2.0325052, 3340.6124267),
    Term::new(0.00103176, 2.370718, 6681.224853),
    Term::new(0.00012877, 0.0, 0.0),
    Term::new(0.00010816, 2.70888, 10021.83728),
    Term::new(0.00001195, 3.047, 13362.4497),
    Term::new(0.00000439, 2.888, 2281.23),
    Term::new(0.00000396, 3.423, 3344.136),
    Term::new(0.00000183, 1.584, 2544.314),
    Term::new(0.00000136, 3.385, 16703.062),
    Term::new(0.00000128, 6.043, 3337.089),
    Term::new(0.00000128, 0.63, 1059.382),
    Term::new(0.00000127, 1.954, 796.298),
    Term::new(0.00000118, 2.998, 2146.165),
    Term::new(0.00000088, 3.42, 398.15),
    Term::new(0.00000083, 3.86, 3738.76),
    Term::new(0.00000076, 4.45, 6151.53),
    Term::new(0.00000072, 2.76, 529.69),
    Term::new(0.00000067, 2.55, 1751.54),
    Term::new(0.00000066, 4.41, 1748.02),
    Term::new(0.00000058, 0.54, 1194.45),
    Term::new(0.00000054, 0.68, 8962.46),
    Term::new(0.00000051, 3.73, 6684.75),
    Term::new(0.00000049, 5.73, 3340.6),
    Term::new(0.00000049, 1.48, 3340.63),
    Term::new(0.00000048, 2.58, 3149.16),
    Term::new(0.00000048, 2.29, 2914.01),
    Term::new(0.00000039, 2.32, 4136.91),
];

const R2: &[Term] = &[
    Term::new(0.00044242, 0.47931, 3340.61243),
    Term::new(0.00008138, 0.87, 6681.2249),
    Term::new(0.00001275, 1.2259, 10021.8373),
    Term::new(0.00000187, 1.573, 13362.45),
    Term::new(0.00000052, 3.14, 0.0),
    Term::new(0.00000041, 1.97, 3344.14),
    Term::new(0.00000027, 1.92, 16703.06),
    Term::new(0.00000018, 4.43, 2281.23),
    Term::new(0.00000012, 4.53, 3185.19),
    Term::new(0.0000001, 5.39, 1059.38),
    Term::new(0.0000001, 0.42, 796.3),
];

const R3: &[Term] = &[
    Term::new(0.00001113, 5.1499, 3340.6124),
    Term::new(0.00000424, 5.613, 6681.225),
    Term::new(0.000001, 5.997, 10021.837),
    Term::new(0.0000002, 0.08, 13362.45),
    Term::new(0.00000005, 3.14, 0.0),
    Term::new(0.00000003, 0.43, 16703.06),
];

const R4: &[Term] = &[
    Term::new(0.0000002, 3.58, 3340.61),
    Term::new(0.00000016, 4.05, 6681.22),
    Term::new(0.00000006, 4.46, 10021.84),
    Term::new(0.00000002, 4.84, 13362.45),
];

/// Longitude, latitude and radius power blocks for Mars.
pub(crate) const MARS: Vsop87Model = Vsop87Model {
    longitude: &[L0, L1, L2, L3, L4, L5],
    latitude: &[B0, B1, B2, B3, B4],
    radius: &[R0, R1, R2, R3, R4],
};
