//! VSOP87D heliocentric ecliptic-of-date series for Uranus.
//!
//! Truncated (Meeus, *Astronomical Algorithms*, appendix III). Amplitudes are in
//! radians for L and B and in AU for R; frequencies are radians per Julian millennium.

use crate::planetlib::vsop87::Vsop87Model;
use crate::serieslib::Term;

const L0: &[Term] = &[
    Term::new(5.48129294, 0.0, 0.0),
    Term::new(0.09260408, 0.8910642, 74.7815986),
    Term::new(0.01504248, 3.6271926, 1.4844727),
    Term::new(0.00365982, 1.899622, 73.297126),
    Term::new(0.00272328, 3.358237, 149.563197),
    Term::new(0.00070328, 5.39254, 63.7359),
    Term::new(0.00068893, 6.09292, 76.26607),
    Term::new(0.00061999, 2.26952, 2.96895),
    Term::new(0.00061951, 2.85099, 11.0457),
    Term::new(0.00026469, 3.14152, 71.81265),
    Term::new(0.00025711, 6.1138, 454.90937),
    Term::new(0.00021079, 4.36059, 148.07872),
    Term::new(0.00017819, 1.74437, 36.64856),
    Term::new(0.00014613, 4.73732, 3.93215),
    Term::new(0.00011163, 5.82682, 224.3448),
    Term::new(0.00010998, 0.48865, 138.5175),
    Term::new(0.00009527, 2.9552, 35.1641),
    Term::new(0.00007546, 5.2363, 109.9457),
    Term::new(0.0000422, 3.2333, 70.8494),
    Term::new(0.00004052, 2.2775, 151.0477),
    Term::new(0.0000349, 5.4831, 146.5943),
    Term::new(0.00003355, 1.0655, 4.4534),
    Term::new(0.00003144, 4.752, 77.7505),
    Term::new(0.00002927, 4.629, 9.5612),
    Term::new(0.00002922, 5.3524, 85.8273),
    Term::new(0.00002273, 4.366, 70.3282),
    Term::new(0.00002149, 0.6075, 38.133),
    Term::new(0.00002051, 1.5177, 0.1119),
    Term::new(0.00001992, 4.9244, 277.035),
    Term::new(0.00001667, 3.6274, 380.1278),
    Term::new(0.00001533, 2.5856, 52.6902),
    Term::new(0.00001376, 2.0428, 65.2204),
    Term::new(0.00001372, 4.1964, 111.4302),
    Term::new(0.00001284, 3.1135, 202.2534),
    Term::new(0.00001282, 0.5427, 222.8603),
    Term::new(0.00001244, 0.9161, 2.4477),
    Term::new(0.00001221, 0.199, 108.4612),
    Term::new(0.00001151, 4.179, 33.6796),
    Term::new(0.0000115, 0.9334, 3.1814),
    Term::new(0.0000109, 1.775, 12.5302),
    Term::new(0.00001072, 0.2356, 62.2514),
    Term::new(0.00000946, 1.192, 127.472),
    Term::new(0.00000708, 5.183, 213.299),
    Term::new(0.00000653, 0.966, 78.714),
    Term::new(0.00000628, 0.182, 984.6),
    Term::new(0.00000607, 5.432, 529.691),
    Term::new(0.00000559, 3.358, 0.521),
    Term::new(0.00000524, 2.013, 299.126),
    Term::new(0.00000483, 2.106, 0.963),
    Term::new(0.00000471, 1.407, 184.727),
    Term::new(0.00000467, 0.415, 145.11),
    Term::new(0.00000434, 5.521, 183.243),
    Term::new(0.00000405, 5.987, 8.077),
    Term::new(0.00000399, 0.338, 415.552),
    Term::new(0.00000396, 5.87, 351.817),
    Term::new(0.00000379, 2.35, 56.622),
    Term::new(0.0000031, 5.833, 145.631),
    Term::new(0.000003, 5.644, 22.091),
    Term::new(0.00000294, 5.839, 39.618),
    Term::new(0.00000252, 1.637, 221.376),
    Term::new(0.00000249, 4.746, 225.829),
    Term::new(0.00000239, 2.35, 137.033),
    Term::new(0.00000224, 0.516, 84.343),
    Term::new(0.00000223, 2.843, 0.261),
    Term::new(0.0000022, 1.922, 67.668),
    Term::new(0.00000217, 6.142, 5.938),
    Term::new(0.00000216, 4.778, 340.771),
    Term::new(0.00000208, 5.58, 68.844),
    Term::new(0.00000202, 1.297, 0.048),
    Term::new(0.00000199, 0.956, 152.532),
    Term::new(0.00000194, 1.888, 456.394),
    Term::new(0.00000193, 0.916, 453.425),
    Term::new(0.00000187, 1.319, 0.16),
    Term::new(0.00000182, 3.536, 79.235),
    Term::new(0.00000173, 1.539, 160.609),
    Term::new(0.00000172, 5.68, 219.891),
    Term::new(0.0000017, 3.677, 5.417),
    Term::new(0.00000169, 5.879, 18.159),
    Term::new(0.00000165, 1.424, 106.977),
    Term::new(0.00000163, 3.05, 112.915),
    Term::new(0.00000158, 0.738, 54.175),
    Term::new(0.00000147, 1.263, 59.804),
    Term::new(0.00000143, 1.3, 35.425),
    Term::new(0.00000139, 5.386, 32.195),
    Term::new(0.00000139, 4.26, 909.819),
    Term::new(0.00000124, 1.374, 7.114),
    Term::new(0.0000011, 2.027, 554.07),
    Term::new(0.00000109, 5.706, 77.963),
    Term::new(0.00000104, 5.028, 0.751),
    Term::new(0.00000104, 1.458, 24.379),
    Term::new(0.00000103, 0.681, 14.978),
];

const L1: &[Term] = &[
    Term::new(75.02543122, 0.0, 0.0),
    Term::new(0.00154458, 5.242017, 74.781599),
    Term::new(0.00024456, 1.71256, 1.48447),
    Term::new(0.00009258, 0.4284, 11.0457),
    Term::new(0.00008266, 1.5022, 63.7359),
    Term::new(0.00007842, 1.3198, 149.5632),
    Term::new(0.00003899, 0.4648, 3.9322),
    Term::new(0.00002284, 4.1737, 76.2661),
    Term::new(0.00001927, 0.5301, 2.9689),
    Term::new(0.00001233, 1.5863, 70.8494),
    Term::new(0.00000791, 5.436, 3.181),
    Term::new(0.00000767, 1.996, 73.297),
    Term::new(0.00000482, 2.984, 85.827),
    Term::new(0.0000045, 4.138, 138.517),
    Term::new(0.00000446, 3.723, 224.345),
    Term::new(0.00000427, 4.731, 71.813),
    Term::new(0.00000354, 2.583, 148.079),
    Term::new(0.00000348, 2.454, 9.561),
    Term::new(0.00000317, 5.579, 52.69),
    Term::new(0.00000206, 2.363, 2.448),
    Term::new(0.00000189, 4.202, 56.622),
    Term::new(0.00000184, 0.284, 151.048),
    Term::new(0.0000018, 5.684, 12.53),
    Term::new(0.00000171, 3.001, 78.714),
    Term::new(0.00000158, 2.909, 0.963),
    Term::new(0.00000155, 5.591, 4.453),
    Term::new(0.00000154, 4.652, 35.164),
    Term::new(0.00000152, 2.942, 77.751),
    Term::new(0.00000143, 2.59, 62.251),
    Term::new(0.00000121, 4.148, 127.472),
    Term::new(0.00000116, 3.732, 65.22),
    Term::new(0.00000102, 4.188, 145.631),
    Term::new(0.00000102, 6.034, 0.112),
    Term::new(0.00000088, 3.99, 18.16),
    Term::new(0.00000088, 6.16, 202.25),
    Term::new(0.00000081, 2.64, 22.09),
    Term::new(0.00000072, 6.05, 70.33),
    Term::new(0.00000069, 4.05, 77.96),
    Term::new(0.00000059, 3.7, 67.67),
    Term::new(0.00000047, 3.54, 351.82),
    Term::new(0.00000044, 5.91, 7.11),
    Term::new(0.00000043, 5.72, 5.42),
    Term::new(0.00000039, 4.92, 222.86),
    Term::new(0.00000036, 5.9, 33.68),
    Term::new(0.00000036, 3.29, 8.08),
    Term::new(0.00000036, 3.33, 71.6),
    Term::new(0.00000035, 5.08, 38.13),
    Term::new(0.00000031, 5.62, 984.6),
    Term::new(0.00000031, 5.5, 59.8),
    Term::new(0.00000031, 5.46, 160.61),
    Term::new(0.0000003, 1.66, 447.8),
    Term::new(0.00000029, 1.15, 462.02),
    Term::new(0.00000029, 4.52, 84.34),
    Term::new(0.00000027, 5.54, 131.4),
    Term::new(0.00000027, 6.15, 299.13),
    Term::new(0.00000026, 4.99, 137.03),
    Term::new(0.00000025, 5.74, 380.13),
];

const L2: &[Term] = &[
    Term::new(0.00053033, 0.0, 0.0),
    Term::new(0.00002358, 2.2601, 74.7816),
    Term::new(0.00000769, 4.526, 11.046),
    Term::new(0.00000552, 3.258, 63.736),
    Term::new(0.00000542, 2.276, 3.932),
    Term::new(0.00000529, 4.923, 1.484),
    Term::new(0.00000258, 3.691, 3.181),
    Term::new(0.00000239, 5.858, 149.563),
    Term::new(0.00000182, 6.218, 70.849),
    Term::new(0.00000054, 1.44, 76.27),
    Term::new(0.00000049, 6.03, 56.62),
    Term::new(0.00000045, 3.91, 2.45),
    Term::new(0.00000045, 0.81, 85.83),
    Term::new(0.00000038, 1.78, 52.69),
    Term::new(0.00000037, 4.46, 2.97),
    Term::new(0.00000033, 0.86, 9.56),
    Term::new(0.00000029, 5.1, 73.3),
    Term::new(0.00000024, 2.11, 18.16),
    Term::new(0.00000022, 5.99, 138.52),
    Term::new(0.00000022, 4.82, 78.71),
    Term::new(0.00000021, 2.4, 77.96),
    Term::new(0.00000021, 2.17, 224.34),
    Term::new(0.00000017, 2.54, 145.63),
    Term::new(0.00000017, 3.47, 12.53),
    Term::new(0.00000012, 0.02, 22.09),
    Term::new(0.00000011, 0.08, 127.47),
    Term::new(0.0000001, 5.16, 71.6),
    Term::new(0.0000001, 4.46, 62.25),
    Term::new(0.00000009, 4.26, 7.11),
    Term::new(0.00000008, 5.5, 67.67),
    Term::new(0.00000007, 1.25, 5.42),
    Term::new(0.00000006, 3.36, 447.8),
    Term::new(0.00000006, 5.45, 65.22),
    Term::new(0.00000006, 4.52, 151.05),
    Term::new(0.00000006, 5.73, 462.02),
];

const L3: &[Term] = &[
    Term::new(0.00000121, 0.024, 74.782),
    Term::new(0.00000068, 4.12, 3.93),
    Term::new(0.00000053, 2.39, 11.05),
    Term::new(0.00000046, 0.0, 0.0),
    Term::new(0.00000045, 2.04, 3.18),
    Term::new(0.00000044, 2.96, 1.48),
    Term::new(0.00000025, 4.89, 63.74),
    Term::new(0.00000021, 4.55, 70.85),
    Term::new(0.0000002, 2.31, 149.56),
    Term::new(0.00000009, 1.58, 56.62),
    Term::new(0.00000004, 0.23, 18.16),
    Term::new(0.00000004, 5.39, 76.27),
    Term::new(0.00000004, 0.95, 77.96),
    Term::new(0.00000003, 4.98, 85.83),
    Term::new(0.00000003, 4.13, 52.69),
    Term::new(0.00000003, 0.37, 78.71),
    Term::new(0.00000002, 0.86, 145.63),
    Term::new(0.00000002, 5.66, 9.56),
];

const L4: &[Term] = &[
    Term::new(0.00000114, 3.142, 0.0),
    Term::new(0.00000006, 4.58, 74.78),
    Term::new(0.00000003, 0.35, 11.05),
    Term::new(0.00000001, 3.42, 56.62),
];

const B0: &[Term] = &[
    Term::new(0.01346278, 2.6187781, 74.7815986),
    Term::new(0.00062341, 5.08111, 149.5632),
    Term::new(0.00061601, 3.14159, 0.0),
    Term::new(0.00009964, 1.616, 76.2661),
    Term::new(0.00009926, 0.5763, 73.2971),
    Term::new(0.00003259, 1.2612, 224.3448),
    Term::new(0.00002972, 2.2437, 1.4845),
    Term::new(0.0000201, 6.0555, 148.0787),
    Term::new(0.00001522, 0.2796, 63.7359),
    Term::new(0.00000924, 4.038, 151.048),
    Term::new(0.00000761, 6.14, 71.813),
    Term::new(0.00000522, 3.321, 138.517),
    Term::new(0.00000463, 0.743, 85.827),
    Term::new(0.00000437, 3.381, 529.691),
    Term::new(0.00000435, 0.341, 77.751),
    Term::new(0.00000431, 3.554, 213.299),
    Term::new(0.0000042, 5.213, 11.046),
    Term::new(0.00000245, 0.788, 2.969),
    Term::new(0.00000233, 2.257, 222.86),
    Term::new(0.00000216, 1.591, 38.133),
    Term::new(0.0000018, 3.725, 299.126),
    Term::new(0.00000175, 1.236, 146.594),
    Term::new(0.00000174, 1.937, 380.128),
    Term::new(0.0000016, 5.336, 111.43),
    Term::new(0.00000144, 5.962, 35.164),
    Term::new(0.00000116, 5.739, 70.849),
    Term::new(0.00000106, 0.941, 70.328),
    Term::new(0.00000102, 2.619, 78.714),
];

const B1: &[Term] = &[
    Term::new(0.00206366, 4.123943, 74.781599),
    Term::new(0.00008563, 0.3382, 149.5632),
    Term::new(0.00001726, 2.1219, 73.2971),
    Term::new(0.00001374, 0.0, 0.0),
    Term::new(0.00001369, 3.0686, 76.2661),
    Term::new(0.00000451, 3.777, 1.484),
    Term::new(0.000004, 2.848, 224.345),
    Term::new(0.00000307, 1.255, 148.079),
    Term::new(0.00000154, 3.786, 63.736),
    Term::new(0.00000112, 5.573, 151.048),
    Term::new(0.00000111, 5.329, 138.517),
    Term::new(0.00000083, 3.59, 71.81),
    Term::new(0.00000056, 3.4, 85.83),
    Term::new(0.00000054, 1.7, 77.75),
    Term::new(0.00000042, 1.21, 11.05),
    Term::new(0.00000041, 4.45, 78.71),
    Term::new(0.00000032, 3.77, 222.86),
    Term::new(0.0000003, 2.56, 2.97),
    Term::new(0.00000027, 5.34, 213.3),
    Term::new(0.00000026, 0.42, 380.13),
];

const B2: &[Term] = &[
    Term::new(0.00009212, 5.8004, 74.7816),
    Term::new(0.00000557, 0.0, 0.0),
    Term::new(0.00000286, 2.177, 149.563),
    Term::new(0.00000095, 3.84, 73.3),
    Term::new(0.00000045, 4.88, 76.27),
    Term::new(0.0000002, 5.46, 1.48),
    Term::new(0.00000015, 0.88, 138.52),
    Term::new(0.00000014, 2.85, 148.08),
    Term::new(0.00000014, 5.07, 63.74),
    Term::new(0.0000001, 5.0, 224.34),
    Term::new(0.00000008, 6.27, 78.71),
];

const B3: &[Term] = &[
    Term::new(0.00000268, 1.251, 74.782),
    Term::new(0.00000011, 3.14, 0.0),
    Term::new(0.00000006, 4.01, 149.56),
    Term::new(0.00000003, 5.78, 73.3),
];

const B4: &[Term] = &[
    Term::new(0.00000006, 2.85, 74.78),
];

const R0: &[Term] = &[
    Term::new(19.21264848, 0.0, 0.0),
    Term::new(0.88784984, 5.60377527, 74.78159857),
    Term::new(0.03440836, 0.328361, 73.2971259),
    Term::new(0.02055653, 1.7829517, 149.5631971),
    Term::new(0.00649322, 4.522473, 76.266071),
    Term::new(0.00602248, 3.860038, 63.735898),
    Term::new(0.00496404, 1.401399, 454.909367),
    Term::new(0.00338526, 1.580027, 138.517497),
    Term::new(0.00243508, 1.570866, 71.812653),
    Term::new(0.00190522, 1.998094, 1.484473),
    Term::new(0.00161858, 2.791379, 148.078724),
    Term::new(0.00143706, 1.383686, 11.0457),
    Term::new(0.00093192, 0.17437, 36.64856),
    Term::new(0.00089806, 3.66105, 109.94569),
    Term::new(0.00071424, 4.24509, 224.3448),
    Term::new(0.00046677, 1.39977, 35.16409),
    Term::new(0.00039026, 3.36235, 277.03499),
    Term::new(0.0003901, 1.66971, 70.84945),
    Term::new(0.00036755, 3.88649, 146.59425),
    Term::new(0.00030349, 0.701, 151.04767),
    Term::new(0.00029156, 3.18056, 77.75054),
    Term::new(0.00025786, 3.78538, 85.8273),
    Term::new(0.0002562, 5.25656, 380.12777),
    Term::new(0.00022637, 0.72519, 529.69097),
    Term::new(0.00020473, 2.7964, 70.32818),
    Term::new(0.00020472, 1.55589, 202.2534),
    Term::new(0.00017901, 0.55455, 2.96895),
    Term::new(0.00015503, 5.35405, 38.13304),
    Term::new(0.00014702, 4.90434, 108.46122),
    Term::new(0.00012897, 2.62154, 111.43016),
    Term::new(0.00012328, 5.96039, 127.4718),
    Term::new(0.00011959, 1.75044, 984.60033),
    Term::new(0.00011853, 0.99343, 52.6902),
    Term::new(0.00011696, 3.29826, 3.93215),
    Term::new(0.00011495, 0.43774, 65.22037),
    Term::new(0.00010793, 1.42105, 213.2991),
    Term::new(0.00009111, 4.9964, 62.2514),
    Term::new(0.00008421, 5.2535, 222.8603),
    Term::new(0.00008402, 5.0388, 415.5525),
    Term::new(0.00007449, 0.7949, 351.8166),
    Term::new(0.00007329, 3.9728, 183.2428),
    Term::new(0.00006046, 5.6796, 78.7138),
    Term::new(0.00005524, 3.115, 9.5612),
    Term::new(0.00005445, 5.1058, 145.1098),
    Term::new(0.00005238, 2.6296, 33.6796),
    Term::new(0.00004079, 3.2206, 340.7709),
    Term::new(0.00003919, 4.2502, 39.6175),
    Term::new(0.00003802, 6.1099, 184.7273),
    Term::new(0.00003781, 3.4584, 456.3938),
    Term::new(0.00003687, 2.4872, 453.4249),
    Term::new(0.00003102, 4.1403, 219.8914),
    Term::new(0.00002963, 0.8298, 56.6224),
    Term::new(0.00002942, 0.4239, 299.1264),
    Term::new(0.0000294, 2.1464, 137.033),
    Term::new(0.00002938, 3.6766, 140.002),
    Term::new(0.00002865, 0.31, 12.5302),
    Term::new(0.00002538, 4.8546, 131.4039),
    Term::new(0.00002364, 0.4425, 554.07),
    Term::new(0.00002183, 2.9404, 305.3462),
];

const R1: &[Term] = &[
    Term::new(0.01479896, 3.6720571, 74.7815986),
    Term::new(0.00071212, 6.22601, 63.7359),
    Term::new(0.00068627, 6.13411, 149.5632),
    Term::new(0.0002406, 3.14159, 0.0),
    Term::new(0.00021468, 2.60177, 76.26607),
    Term::new(0.00020857, 5.24625, 11.0457),
    Term::new(0.00011405, 0.01848, 70.84945),
    Term::new(0.00007497, 0.4236, 73.2971),
    Term::new(0.00004244, 1.4169, 85.8273),
    Term::new(0.00003927, 3.1551, 71.8127),
    Term::new(0.00003578, 2.3116, 224.3448),
    Term::new(0.00003506, 2.5835, 138.5175),
    Term::new(0.00003229, 5.255, 3.9322),
    Term::new(0.0000306, 0.1532, 1.4845),
    Term::new(0.00002564, 0.9808, 148.0787),
    Term::new(0.00002429, 3.9944, 52.6902),
    Term::new(0.00001645, 2.6535, 127.4718),
    Term::new(0.00001584, 1.4305, 78.7138),
    Term::new(0.00001508, 5.06, 151.0477),
    Term::new(0.0000149, 2.6756, 56.6224),
    Term::new(0.00001413, 4.5746, 202.2534),
    Term::new(0.00001403, 1.3699, 77.7505),
    Term::new(0.00001228, 1.047, 62.2514),
    Term::new(0.00001033, 0.2646, 131.4039),
    Term::new(0.00000992, 2.172, 65.22),
    Term::new(0.00000862, 5.055, 351.817),
    Term::new(0.00000744, 3.076, 35.164),
    Term::new(0.00000687, 2.499, 77.963),
    Term::new(0.00000647, 4.473, 70.328),
    Term::new(0.00000624, 0.863, 9.561),
    Term::new(0.00000604, 0.907, 984.6),
    Term::new(0.00000575, 3.231, 447.796),
    Term::new(0.00000562, 2.718, 462.023),
    Term::new(0.0000053, 5.917, 213.299),
    Term::new(0.00000528, 5.151, 2.969),
];

const R2: &[Term] = &[
    Term::new(0.0002244, 0.69953, 74.7816),
    Term::new(0.00004727, 1.699, 63.7359),
    Term::new(0.00001682, 4.6483, 70.8494),
    Term::new(0.0000165, 3.0966, 11.0457),
    Term::new(0.00001434, 3.5212, 149.5632),
    Term::new(0.0000077, 0.0, 0.0),
    Term::new(0.000005, 6.172, 76.266),
    Term::new(0.00000461, 0.767, 3.932),
    Term::new(0.0000039, 4.496, 56.622),
    Term::new(0.0000039, 5.527, 85.827),
    Term::new(0.00000292, 0.204, 52.69),
    Term::new(0.00000287, 3.534, 73.297),
    Term::new(0.00000273, 3.847, 138.517),
    Term::new(0.0000022, 1.964, 131.404),
    Term::new(0.00000216, 0.848, 77.963),
    Term::new(0.00000205, 3.248, 78.714),
    Term::new(0.00000149, 4.898, 127.472),
    Term::new(0.00000129, 2.081, 3.181),
];

const R3: &[Term] = &[
    Term::new(0.00001164, 4.7345, 74.7816),
    Term::new(0.00000212, 3.343, 63.736),
    Term::new(0.00000196, 2.98, 70.849),
    Term::new(0.00000105, 0.958, 11.046),
    Term::new(0.00000073, 1.0, 149.56),
    Term::new(0.00000072, 0.03, 56.62),
    Term::new(0.00000055, 2.59, 3.93),
    Term::new(0.00000036, 5.65, 77.96),
    Term::new(0.00000034, 3.82, 76.27),
    Term::new(0.00000032, 3.6, 131.4),
];

const R4: &[Term] = &[
    Term::new(0.00000053, 3.01, 74.78),
    Term::new(0.0000001, 1.91, 56.62),
];

/// Longitude, latitude and radius power blocks for Uranus.
pub(crate) const URANUS: Vsop87Model = Vsop87Model {
    longitude: &[L0, L1, L2, L3, L4],
    latitude: &[B0, B1, B2, B3, B4],
    radius: &[R0, R1, R2, R3, R4],
};
