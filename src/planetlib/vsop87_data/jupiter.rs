//! VSOP87D heliocentric ecliptic-of-date series for Jupiter.
//!
//! Truncated (Meeus, *Astronomical Algorithms*, appendix III). Amplitudes are in
//! radians for L and B and in AU for R; frequencies are radians per Julian millennium.

use crate::planetlib::vsop87::Vsop87Model;
use crate::serieslib::Term;

const L0: &[Term] = &[
    Term::new(0.59954691, 0.0, 0.0),
    Term::new(0.09695899, 5.0619179, 529.6909651),
    Term::new(0.0057361, 1.444062, 7.113547),
    Term::new(0.00306389, 5.417347, 1059.38193),
    Term::new(0.00097178, 4.14265, 632.78374),
    Term::new(0.00072903, 3.64043, 522.57742),
    Term::new(0.00064264, 3.41145, 103.09277),
    Term::new(0.00039806, 2.29377, 419.48464),
    Term::new(0.00038858, 1.27232, 316.39187),
    Term::new(0.00027965, 1.78455, 536.80451),
    Term::new(0.0001359, 5.77481, 1589.0729),
    Term::new(0.00008769, 3.63, 949.1756),
    Term::new(0.00008246, 3.5823, 206.1855),
    Term::new(0.00007368, 5.081, 735.8765),
    Term::new(0.00006263, 0.025, 213.2991),
    Term::new(0.00006114, 4.5132, 1162.4747),
    Term::new(0.00005305, 4.1863, 1052.2684),
    Term::new(0.00005305, 1.3067, 14.2271),
    Term::new(0.00004905, 1.3208, 110.2063),
    Term::new(0.00004647, 4.6996, 3.9322),
    Term::new(0.00003045, 4.3168, 426.5982),
    Term::new(0.0000261, 1.5667, 846.0828),
    Term::new(0.00002028, 1.0638, 3.1814),
    Term::new(0.00001921, 0.9717, 639.8973),
    Term::new(0.00001765, 2.1415, 1066.4955),
    Term::new(0.00001723, 3.8804, 1265.5675),
    Term::new(0.00001633, 3.582, 515.4639),
    Term::new(0.00001432, 4.2968, 625.6702),
    Term::new(0.00000973, 4.098, 95.979),
    Term::new(0.00000884, 2.437, 412.371),
    Term::new(0.00000733, 6.085, 838.969),
    Term::new(0.00000731, 3.806, 1581.959),
    Term::new(0.00000709, 1.293, 742.99),
    Term::new(0.00000692, 6.134, 2118.764),
    Term::new(0.00000614, 4.109, 1478.867),
    Term::new(0.00000582, 4.54, 309.278),
    Term::new(0.00000495, 3.756, 323.505),
    Term::new(0.00000441, 2.958, 454.909),
    Term::new(0.00000417, 1.036, 2.448),
    Term::new(0.0000039, 4.897, 1692.166),
    Term::new(0.00000376, 4.703, 1368.66),
    Term::new(0.00000341, 5.715, 533.623),
    Term::new(0.0000033, 4.74, 0.048),
    Term::new(0.00000262, 1.877, 0.963),
    Term::new(0.00000261, 0.82, 380.128),
    Term::new(0.00000257, 3.724, 199.072),
    Term::new(0.00000244, 5.22, 728.763),
    Term::new(0.00000235, 1.227, 909.819),
    Term::new(0.0000022, 1.651, 543.918),
    Term::new(0.00000207, 1.855, 525.759),
    Term::new(0.00000202, 1.807, 1375.774),
    Term::new(0.00000197, 5.293, 1155.361),
    Term::new(0.00000175, 3.73, 942.062),
    Term::new(0.00000175, 3.226, 1898.351),
    Term::new(0.00000175, 5.91, 956.289),
    Term::new(0.00000158, 4.365, 1795.258),
    Term::new(0.00000151, 3.906, 74.782),
    Term::new(0.00000149, 4.377, 1685.052),
    Term::new(0.00000141, 3.136, 491.558),
    Term::new(0.00000138, 1.318, 1169.588),
    Term::new(0.00000131, 4.169, 1045.155),
    Term::new(0.00000117, 2.5, 1596.186),
    Term::new(0.00000117, 3.389, 0.521),
    Term::new(0.00000106, 4.554, 526.51),
];

const L1: &[Term] = &[
    Term::new(529.93480757, 0.0, 0.0),
    Term::new(0.00489741, 4.220667, 529.690965),
    Term::new(0.00228919, 6.026475, 7.113547),
    Term::new(0.00027655, 4.57266, 1059.38193),
    Term::new(0.00020721, 5.45939, 522.57742),
    Term::new(0.00012106, 0.16986, 536.80451),
    Term::new(0.00006068, 4.4242, 103.0928),
    Term::new(0.00005434, 3.9848, 419.4846),
    Term::new(0.00004238, 5.8901, 14.2271),
    Term::new(0.00002212, 5.2677, 206.1855),
    Term::new(0.00001746, 4.9267, 1589.0729),
    Term::new(0.00001296, 5.5513, 3.1814),
    Term::new(0.00001173, 5.8565, 1052.2684),
    Term::new(0.00001163, 0.5145, 3.9322),
    Term::new(0.00001099, 5.307, 515.4639),
    Term::new(0.00001007, 0.4648, 735.8765),
    Term::new(0.00001004, 3.1504, 426.5982),
    Term::new(0.00000848, 5.758, 110.206),
    Term::new(0.00000827, 4.803, 213.299),
    Term::new(0.00000816, 0.586, 1066.495),
    Term::new(0.00000725, 5.518, 639.897),
    Term::new(0.00000568, 5.989, 625.67),
    Term::new(0.00000474, 4.132, 412.371),
    Term::new(0.00000413, 5.737, 95.979),
    Term::new(0.00000345, 4.242, 632.784),
    Term::new(0.00000336, 3.732, 1162.475),
    Term::new(0.00000234, 4.035, 949.176),
    Term::new(0.00000234, 6.243, 309.278),
    Term::new(0.00000199, 1.505, 838.969),
    Term::new(0.00000195, 2.219, 323.505),
    Term::new(0.00000187, 6.086, 742.99),
    Term::new(0.00000184, 6.28, 543.918),
    Term::new(0.00000171, 5.417, 199.072),
    Term::new(0.00000131, 0.626, 728.763),
    Term::new(0.00000115, 0.68, 846.083),
    Term::new(0.00000115, 5.286, 2118.764),
    Term::new(0.00000108, 4.493, 956.289),
    Term::new(0.0000008, 5.82, 1045.15),
    Term::new(0.00000072, 5.34, 942.06),
    Term::new(0.0000007, 5.97, 532.87),
    Term::new(0.00000067, 5.73, 21.34),
    Term::new(0.00000066, 0.13, 526.51),
    Term::new(0.00000065, 6.09, 1581.96),
    Term::new(0.00000059, 0.59, 2.45),
    Term::new(0.00000058, 0.99, 1596.19),
    Term::new(0.00000057, 5.97, 1169.59),
    Term::new(0.00000057, 1.41, 533.62),
    Term::new(0.00000055, 5.43, 10.29),
    Term::new(0.00000052, 5.73, 454.91),
    Term::new(0.00000052, 0.23, 1155.36),
    Term::new(0.00000051, 6.03, 1478.87),
];

const L2: &[Term] = &[
    Term::new(0.00047234, 4.32148, 7.11355),
    Term::new(0.00038966, 0.0, 0.0),
    Term::new(0.00030629, 2.93021, 529.69097),
    Term::new(0.00003189, 1.055, 522.5774),
    Term::new(0.00002729, 4.8455, 536.8045),
    Term::new(0.00002723, 3.4141, 1059.3819),
    Term::new(0.00001721, 4.1873, 14.2271),
    Term::new(0.00000383, 5.768, 419.485),
    Term::new(0.00000378, 0.76, 515.464),
    Term::new(0.00000367, 6.055, 103.093),
    Term::new(0.00000337, 3.786, 3.181),
    Term::new(0.00000308, 0.694, 206.186),
    Term::new(0.00000218, 3.814, 1589.073),
    Term::new(0.00000199, 5.34, 1066.495),
    Term::new(0.00000197, 2.484, 3.932),
    Term::new(0.00000156, 1.406, 1052.268),
    Term::new(0.00000146, 3.814, 639.897),
    Term::new(0.00000142, 1.634, 426.598),
    Term::new(0.0000013, 5.837, 412.371),
    Term::new(0.00000117, 1.414, 625.67),
    Term::new(0.00000097, 4.03, 110.21),
    Term::new(0.00000091, 1.11, 95.98),
    Term::new(0.00000087, 2.52, 632.78),
    Term::new(0.00000079, 4.64, 543.92),
    Term::new(0.00000072, 2.22, 735.88),
    Term::new(0.00000058, 0.83, 199.07),
    Term::new(0.00000057, 3.12, 213.3),
    Term::new(0.00000049, 1.67, 309.28),
    Term::new(0.0000004, 4.02, 21.34),
    Term::new(0.0000004, 0.62, 323.51),
    Term::new(0.00000036, 2.33, 728.76),
    Term::new(0.00000029, 3.61, 10.29),
    Term::new(0.00000028, 3.24, 838.97),
    Term::new(0.00000026, 4.5, 742.99),
    Term::new(0.00000026, 2.51, 1162.47),
    Term::new(0.00000025, 1.22, 1045.15),
    Term::new(0.00000024, 3.01, 956.29),
    Term::new(0.00000019, 4.29, 532.87),
    Term::new(0.00000018, 0.81, 508.35),
    Term::new(0.00000017, 4.2, 2118.76),
    Term::new(0.00000017, 1.83, 526.51),
    Term::new(0.00000015, 5.81, 1596.19),
    Term::new(0.00000015, 0.68, 942.06),
    Term::new(0.00000015, 4.0, 117.32),
    Term::new(0.00000014, 5.95, 316.39),
    Term::new(0.00000014, 1.8, 302.16),
    Term::new(0.00000013, 2.52, 88.87),
    Term::new(0.00000013, 4.37, 1169.59),
    Term::new(0.00000011, 4.44, 525.76),
    Term::new(0.0000001, 1.72, 1581.96),
    Term::new(0.00000009, 2.18, 1155.36),
    Term::new(0.00000009, 3.29, 220.41),
    Term::new(0.00000009, 3.32, 831.86),
    Term::new(0.00000008, 5.76, 846.08),
    Term::new(0.00000008, 2.71, 533.62),
    Term::new(0.00000007, 2.18, 1265.57),
    Term::new(0.00000006, 0.5, 949.18),
];

const L3: &[Term] = &[
    Term::new(0.00006502, 2.5986, 7.1135),
    Term::new(0.00001357, 1.3464, 529.691),
    Term::new(0.00000471, 2.475, 14.227),
    Term::new(0.00000417, 3.245, 536.805),
    Term::new(0.00000353, 2.974, 522.577),
    Term::new(0.00000155, 2.076, 1059.382),
    Term::new(0.00000087, 2.59, 515.46),
    Term::new(0.00000044, 0.0, 0.0),
    Term::new(0.00000034, 3.83, 1066.5),
    Term::new(0.00000028, 2.45, 206.19),
    Term::new(0.00000024, 1.28, 412.37),
    Term::new(0.00000023, 2.98, 543.92),
    Term::new(0.0000002, 2.1, 639.9),
    Term::new(0.0000002, 1.4, 419.48),
    Term::new(0.00000019, 1.59, 103.09),
    Term::new(0.00000017, 2.3, 21.34),
    Term::new(0.00000017, 2.6, 1589.07),
    Term::new(0.00000016, 3.15, 625.67),
    Term::new(0.00000016, 3.36, 1052.27),
    Term::new(0.00000013, 2.76, 95.98),
    Term::new(0.00000013, 2.54, 199.07),
    Term::new(0.00000013, 6.27, 426.6),
    Term::new(0.00000009, 1.76, 10.29),
    Term::new(0.00000009, 2.27, 110.21),
    Term::new(0.00000007, 3.43, 309.28),
    Term::new(0.00000007, 4.04, 728.76),
    Term::new(0.00000006, 2.52, 508.35),
    Term::new(0.00000005, 2.91, 1045.15),
    Term::new(0.00000005, 5.25, 323.51),
    Term::new(0.00000004, 4.3, 88.87),
    Term::new(0.00000004, 3.52, 302.16),
    Term::new(0.00000004, 4.09, 735.88),
    Term::new(0.00000003, 1.43, 956.29),
    Term::new(0.00000003, 4.36, 1596.19),
    Term::new(0.00000003, 1.25, 213.3),
    Term::new(0.00000003, 5.02, 838.97),
    Term::new(0.00000003, 2.24, 117.32),
    Term::new(0.00000002, 2.9, 742.99),
    Term::new(0.00000002, 2.36, 942.06),
];

const L4: &[Term] = &[
    Term::new(0.00000669, 0.853, 7.114),
    Term::new(0.00000114, 3.142, 0.0),
    Term::new(0.000001, 0.743, 14.227),
    Term::new(0.0000005, 1.65, 536.8),
    Term::new(0.00000044, 5.82, 529.69),
    Term::new(0.00000032, 4.86, 522.58),
    Term::new(0.00000015, 4.29, 515.46),
    Term::new(0.00000009, 0.71, 1059.38),
    Term::new(0.00000005, 1.3, 543.92),
    Term::new(0.00000004, 2.32, 1066.5),
    Term::new(0.00000004, 0.48, 21.34),
    Term::new(0.00000003, 3.0, 412.37),
    Term::new(0.00000002, 0.4, 639.9),
    Term::new(0.00000002, 4.26, 199.07),
    Term::new(0.00000002, 4.91, 625.67),
    Term::new(0.00000002, 4.26, 206.19),
    Term::new(0.00000001, 5.26, 1052.27),
    Term::new(0.00000001, 4.72, 95.98),
    Term::new(0.00000001, 1.29, 1589.07),
];

const L5: &[Term] = &[
    Term::new(0.0000005, 5.26, 7.11),
    Term::new(0.00000016, 5.25, 14.23),
    Term::new(0.00000004, 0.01, 536.8),
    Term::new(0.00000002, 1.1, 522.58),
    Term::new(0.00000001, 3.14, 0.0),
];

const B0: &[Term] = &[
    Term::new(0.02268616, 3.5585261, 529.6909651),
    Term::new(0.0011009, 0.0, 0.0),
    Term::new(0.00109972, 3.908093, 1059.38193),
    Term::new(0.00008101, 3.6051, 522.5774),
    Term::new(0.00006438, 0.3063, 536.8045),
    Term::new(0.00006044, 4.2588, 1589.0729),
    Term::new(0.00001107, 2.9853, 1162.4747),
    Term::new(0.00000944, 1.675, 426.598),
    Term::new(0.00000942, 2.936, 1052.268),
    Term::new(0.00000894, 1.754, 7.114),
    Term::new(0.00000836, 5.179, 103.093),
    Term::new(0.00000767, 2.155, 632.784),
    Term::new(0.00000684, 3.678, 213.299),
    Term::new(0.00000629, 0.643, 1066.495),
    Term::new(0.00000559, 0.014, 846.083),
    Term::new(0.00000532, 2.703, 110.206),
    Term::new(0.00000464, 1.173, 949.176),
    Term::new(0.00000431, 2.608, 419.485),
    Term::new(0.00000351, 4.611, 2118.764),
    Term::new(0.00000132, 4.778, 742.99),
    Term::new(0.00000123, 3.35, 1692.166),
    Term::new(0.00000116, 1.387, 323.505),
    Term::new(0.00000115, 5.049, 316.392),
    Term::new(0.00000104, 3.701, 515.464),
    Term::new(0.00000103, 2.319, 1478.867),
    Term::new(0.00000102, 3.153, 1581.959),
];

const B1: &[Term] = &[
    Term::new(0.00177352, 5.701665, 529.690965),
    Term::new(0.0000323, 5.7794, 1059.3819),
    Term::new(0.00003081, 5.4746, 522.5774),
    Term::new(0.00002212, 4.7348, 536.8045),
    Term::new(0.00001694, 3.1416, 0.0),
    Term::new(0.00000346, 4.746, 1052.268),
    Term::new(0.00000234, 5.189, 1066.495),
    Term::new(0.00000196, 6.186, 7.114),
    Term::new(0.0000015, 3.927, 1589.073),
    Term::new(0.00000114, 3.439, 632.784),
    Term::new(0.00000097, 2.91, 949.18),
    Term::new(0.00000082, 5.08, 1162.47),
    Term::new(0.00000077, 2.51, 103.09),
    Term::new(0.00000077, 0.61, 419.48),
    Term::new(0.00000074, 5.5, 515.46),
    Term::new(0.00000061, 5.45, 213.3),
    Term::new(0.0000005, 3.95, 735.88),
    Term::new(0.00000046, 0.54, 110.21),
    Term::new(0.00000045, 1.9, 846.08),
    Term::new(0.00000037, 4.7, 543.92),
    Term::new(0.00000036, 6.11, 316.39),
    Term::new(0.00000032, 4.92, 1581.96),
];

const B2: &[Term] = &[
    Term::new(0.00008094, 1.4632, 529.691),
    Term::new(0.00000813, 3.1416, 0.0),
    Term::new(0.00000742, 0.957, 522.577),
    Term::new(0.00000399, 2.899, 536.805),
    Term::new(0.00000342, 1.447, 1059.382),
    Term::new(0.00000074, 0.41, 1052.27),
    Term::new(0.00000046, 3.48, 1066.5),
    Term::new(0.0000003, 1.93, 1589.07),
    Term::new(0.00000029, 0.99, 515.46),
    Term::new(0.00000023, 4.27, 7.11),
    Term::new(0.00000014, 2.92, 543.92),
    Term::new(0.00000012, 5.22, 632.78),
    Term::new(0.00000011, 4.88, 949.18),
    Term::new(0.00000006, 6.21, 1045.15),
];

const B3: &[Term] = &[
    Term::new(0.00000252, 3.381, 529.691),
    Term::new(0.00000122, 2.733, 522.577),
    Term::new(0.00000049, 1.04, 536.8),
    Term::new(0.00000011, 2.31, 1052.27),
    Term::new(0.00000008, 2.77, 515.46),
    Term::new(0.00000007, 4.25, 1059.38),
    Term::new(0.00000006, 1.78, 1066.5),
    Term::new(0.00000004, 1.13, 543.92),
    Term::new(0.00000003, 3.14, 0.0),
];

const B4: &[Term] = &[
    Term::new(0.00000015, 4.53, 522.58),
    Term::new(0.00000005, 4.47, 529.69),
    Term::new(0.00000004, 5.44, 536.8),
    Term::new(0.00000003, 0.0, 0.0),
    Term::new(0.00000002, 4.52, 515.46),
    Term::new(0.00000001, 4.2, 1052.27),
];

const B5: &[Term] = &[
    Term::new(0.00000001, 0.09, 522.58),
];

const R0: &[Term] = &[
    Term::new(5.20887429, 0.0, 0.0),
    Term::new(0.25209327, 3.4910864, 529.69096509),
    Term::new(0.006106, 3.841154, 1059.38193),
    Term::new(0.00282029, 2.574199, 632.783739),
    Term::new(0.00187647, 2.075904, 522.577418),
    Term::new(0.00086793, 0.71001, 419.48464),
    Term::new(0.00072063, 0.21466, 536.80451),
    Term::new(0.00065517, 5.97996, 316.39187),
    Term::new(0.00030135, 2.16132, 949.17561),
    Term::new(0.00029135, 1.67759, 103.09277),
    Term::new(0.00023947, 0.27458, 7.11355),
    Term::new(0.00023453, 3.54023, 735.87651),
    Term::new(0.00022284, 4.19363, 1589.0729),
    Term::new(0.00013033, 2.96043, 1162.4747),
    Term::new(0.00012749, 2.7155, 1052.26838),
    Term::new(0.00009703, 1.9067, 206.1855),
    Term::new(0.00009161, 4.4135, 213.2991),
    Term::new(0.00007895, 2.4791, 426.5982),
    Term::new(0.00007058, 2.1818, 1265.5675),
    Term::new(0.00006138, 6.2642, 846.0828),
    Term::new(0.00005477, 5.6573, 639.8973),
    Term::new(0.0000417, 2.0161, 515.4639),
    Term::new(0.00004137, 2.7222, 625.6702),
    Term::new(0.00003503, 0.5653, 1066.4955),
    Term::new(0.00002617, 2.0099, 1581.9593),
    Term::new(0.000025, 4.5518, 838.9693),
    Term::new(0.00002128, 6.1275, 742.9901),
    Term::new(0.00001912, 0.8562, 412.3711),
    Term::new(0.00001611, 3.0887, 1368.6603),
    Term::new(0.00001479, 2.6803, 1478.8666),
    Term::new(0.00001231, 1.8904, 323.5054),
    Term::new(0.00001217, 1.8017, 110.2063),
    Term::new(0.00001015, 1.3867, 454.9094),
    Term::new(0.00000999, 2.872, 309.278),
    Term::new(0.00000961, 4.549, 2118.764),
    Term::new(0.00000886, 4.148, 533.623),
    Term::new(0.00000821, 1.593, 1898.351),
    Term::new(0.00000812, 5.941, 909.819),
    Term::new(0.00000777, 3.677, 728.763),
    Term::new(0.00000727, 3.988, 1155.361),
    Term::new(0.00000655, 2.791, 1685.052),
    Term::new(0.00000654, 3.382, 1692.166),
    Term::new(0.00000621, 4.823, 956.289),
    Term::new(0.00000615, 2.276, 942.062),
    Term::new(0.00000562, 0.081, 543.918),
    Term::new(0.00000542, 0.284, 525.759),
];

const R1: &[Term] = &[
    Term::new(0.01271802, 2.6493751, 529.6909651),
    Term::new(0.00061662, 3.00076, 1059.38193),
    Term::new(0.00053444, 3.89718, 522.57742),
    Term::new(0.0004139, 0.0, 0.0),
    Term::new(0.00031185, 4.88277, 536.80451),
    Term::new(0.00011847, 2.4133, 419.48464),
    Term::new(0.00009166, 4.7598, 7.1135),
    Term::new(0.00003404, 3.3469, 1589.0729),
    Term::new(0.00003203, 5.2108, 735.8765),
    Term::new(0.00003176, 2.793, 103.0928),
    Term::new(0.00002806, 3.7422, 515.4639),
    Term::new(0.00002677, 4.3305, 1052.2684),
    Term::new(0.000026, 3.6344, 206.1855),
    Term::new(0.00002412, 1.4695, 426.5982),
    Term::new(0.00002101, 3.9276, 639.8973),
    Term::new(0.00001646, 4.4163, 1066.4955),
    Term::new(0.00001641, 4.4163, 625.6702),
    Term::new(0.0000105, 3.1611, 213.2991),
    Term::new(0.00001025, 2.5543, 412.3711),
    Term::new(0.00000806, 2.678, 632.784),
    Term::new(0.00000741, 2.171, 1162.475),
    Term::new(0.00000677, 6.25, 838.969),
    Term::new(0.00000567, 4.577, 742.99),
    Term::new(0.00000485, 2.469, 949.176),
    Term::new(0.00000469, 4.71, 543.918),
    Term::new(0.00000445, 0.403, 323.505),
    Term::new(0.00000416, 5.368, 728.763),
    Term::new(0.00000402, 4.605, 309.278),
    Term::new(0.00000347, 4.681, 14.227),
    Term::new(0.00000338, 3.168, 956.289),
    Term::new(0.00000261, 5.343, 846.083),
    Term::new(0.00000247, 3.923, 942.062),
    Term::new(0.0000022, 4.842, 1368.66),
    Term::new(0.00000203, 5.6, 1155.361),
    Term::new(0.000002, 4.439, 1045.155),
    Term::new(0.00000197, 3.706, 2118.764),
    Term::new(0.00000196, 3.759, 199.072),
    Term::new(0.00000184, 4.265, 95.979),
    Term::new(0.0000018, 4.402, 532.872),
    Term::new(0.0000017, 4.846, 526.51),
    Term::new(0.00000146, 6.13, 533.623),
    Term::new(0.00000133, 1.322, 110.206),
    Term::new(0.00000132, 4.512, 525.759),
];

const R2: &[Term] = &[
    Term::new(0.00079645, 1.35866, 529.69097),
    Term::new(0.00008252, 5.7777, 522.5774),
    Term::new(0.0000703, 3.2748, 536.8045),
    Term::new(0.00005314, 1.8384, 1059.3819),
    Term::new(0.00001861, 2.9768, 7.1135),
    Term::new(0.00000964, 5.48, 515.464),
    Term::new(0.00000836, 4.199, 419.485),
    Term::new(0.00000498, 3.142, 0.0),
    Term::new(0.00000427, 2.228, 639.897),
    Term::new(0.00000406, 3.783, 1066.495),
    Term::new(0.00000377, 2.242, 1589.073),
    Term::new(0.00000363, 5.368, 206.186),
    Term::new(0.00000342, 6.099, 1052.268),
    Term::new(0.00000339, 6.127, 625.67),
    Term::new(0.00000333, 0.003, 426.598),
    Term::new(0.0000028, 4.262, 412.371),
    Term::new(0.00000257, 0.963, 632.784),
    Term::new(0.0000023, 0.705, 735.877),
    Term::new(0.00000201, 3.069, 543.918),
    Term::new(0.000002, 4.429, 103.093),
    Term::new(0.00000139, 2.932, 14.227),
    Term::new(0.00000114, 0.787, 728.763),
    Term::new(0.00000095, 1.7, 838.97),
    Term::new(0.00000086, 5.14, 323.51),
    Term::new(0.00000083, 0.06, 309.28),
    Term::new(0.0000008, 2.98, 742.99),
    Term::new(0.00000075, 1.6, 956.29),
    Term::new(0.0000007, 1.51, 213.3),
    Term::new(0.00000067, 5.47, 199.07),
    Term::new(0.00000062, 6.1, 1045.15),
    Term::new(0.00000056, 0.96, 1162.47),
    Term::new(0.00000052, 5.58, 942.06),
    Term::new(0.0000005, 2.72, 532.87),
    Term::new(0.00000045, 5.52, 508.35),
    Term::new(0.00000044, 0.27, 526.51),
    Term::new(0.0000004, 5.95, 95.98),
];

const R3: &[Term] = &[
    Term::new(0.00003519, 6.058, 529.691),
    Term::new(0.00001073, 1.6732, 536.8045),
    Term::new(0.00000916, 1.413, 522.577),
    Term::new(0.00000342, 0.523, 1059.382),
    Term::new(0.00000255, 1.196, 7.114),
    Term::new(0.00000222, 0.952, 515.464),
    Term::new(0.0000009, 3.14, 0.0),
    Term::new(0.00000069, 2.27, 1066.5),
    Term::new(0.00000058, 1.41, 543.92),
    Term::new(0.00000058, 0.53, 639.9),
    Term::new(0.00000051, 5.98, 412.37),
    Term::new(0.00000047, 1.58, 625.67),
    Term::new(0.00000043, 6.12, 419.48),
    Term::new(0.00000037, 1.18, 14.23),
    Term::new(0.00000034, 1.67, 1052.27),
    Term::new(0.00000034, 0.85, 206.19),
    Term::new(0.00000031, 1.04, 1589.07),
    Term::new(0.0000003, 4.63, 426.6),
    Term::new(0.00000021, 2.5, 728.76),
    Term::new(0.00000015, 0.89, 199.07),
    Term::new(0.00000014, 0.96, 508.35),
    Term::new(0.00000013, 1.5, 1045.15),
    Term::new(0.00000012, 2.61, 735.88),
    Term::new(0.00000012, 3.56, 323.51),
    Term::new(0.00000011, 1.79, 309.28),
    Term::new(0.00000011, 6.28, 956.29),
    Term::new(0.0000001, 6.26, 103.09),
    Term::new(0.00000009, 3.45, 838.97),
];

const R4: &[Term] = &[
    Term::new(0.00000129, 0.084, 536.805),
    Term::new(0.00000113, 4.249, 529.691),
    Term::new(0.00000083, 3.3, 522.58),
    Term::new(0.00000038, 2.73, 515.46),
    Term::new(0.00000027, 5.69, 7.11),
    Term::new(0.00000018, 5.4, 1059.38),
    Term::new(0.00000013, 6.02, 543.92),
    Term::new(0.00000009, 0.77, 1066.5),
    Term::new(0.00000008, 5.68, 14.23),
    Term::new(0.00000007, 1.43, 412.37),
    Term::new(0.00000006, 5.12, 639.9),
    Term::new(0.00000005, 3.34, 625.67),
    Term::new(0.00000003, 3.4, 1052.27),
    Term::new(0.00000003, 4.16, 728.76),
    Term::new(0.00000003, 2.9, 426.6),
];

const R5: &[Term] = &[
    Term::new(0.00000011, 4.75, 536.8),
    Term::new(0.00000004, 5.92, 522.58),
    Term::new(0.00000002, 5.57, 515.46),
    Term::new(0.00000002, 4.3, 543.92),
    Term::new(0.00000002, 3.69, 7.11),
    Term::new(0.00000002, 4.13, 1059.38),
    Term::new(0.00000002, 5.49, 1066.5),
];

/// Longitude, latitude and radius power blocks for Jupiter.
pub(crate) const JUPITER: Vsop87Model = Vsop87Model {
    longitude: &[L0, L1, L2, L3, L4, L5],
    latitude: &[B0, B1, B2, B3, B4, B5],
    radius: &[R0, R1, R2, R3, R4, R5],
};
