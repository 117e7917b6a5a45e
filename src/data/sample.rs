use super::{Dataset, Feature, YearRange};
use crate::error::Result;
use crate::stats::group_thousands;
use geojson::{JsonObject, JsonValue};

/// Approximate inbound arrivals in thousands, 2013 through 2020
const SAMPLE: &[(&str, f64, f64, [u32; 8])] = &[
    ("France", 2.2, 46.6, [83634, 83701, 84452, 82682, 86918, 89322, 90914, 41684]),
    ("Spain", -3.7, 40.2, [60675, 64939, 68175, 75315, 81869, 82808, 83509, 18933]),
    ("United States", -98.6, 39.8, [69995, 75022, 77774, 76407, 77186, 79746, 79442, 19212]),
    ("China", 104.2, 35.9, [55686, 55622, 56886, 59270, 60740, 62900, 65700, 7967]),
    ("Italy", 12.6, 42.5, [47704, 48576, 50732, 52372, 58253, 61567, 64513, 25190]),
    ("Mexico", -102.5, 23.6, [24151, 29346, 32093, 35079, 39291, 41313, 45024, 24284]),
    ("Thailand", 101.0, 15.9, [26547, 24810, 29923, 32530, 35592, 38178, 39916, 6702]),
    ("Germany", 10.4, 51.2, [31545, 32999, 34970, 35555, 37452, 38881, 39563, 12449]),
    ("United Kingdom", -2.0, 54.0, [31064, 32613, 34436, 35814, 37651, 36316, 40857, 10714]),
    ("Japan", 138.3, 36.2, [10364, 13413, 19737, 24040, 28691, 31192, 31882, 4116]),
    ("Egypt", 30.8, 26.8, [9174, 9628, 9139, 5258, 8157, 11196, 13026, 3677]),
    ("South Africa", 24.0, -29.0, [9537, 9549, 8904, 10044, 10285, 10472, 10229, 2802]),
    ("India", 79.0, 22.0, [6968, 7679, 8027, 8804, 10036, 10930, 10930, 2745]),
    ("Australia", 134.5, -25.7, [6382, 6868, 7444, 8263, 8815, 9246, 9466, 1828]),
    ("Brazil", -51.9, -14.2, [5813, 6430, 6306, 6547, 6589, 6621, 6353, 2146]),
    ("Iceland", -19.0, 64.9, [807, 998, 1289, 1792, 2225, 2344, 1986, 486]),
];

const SAMPLE_FIRST_YEAR: u16 = 2013;

/// Small built-in dataset used when no data file is available.
/// Years outside 2013..=2020 repeat the nearest year on record.
pub fn sample_dataset(range: YearRange) -> Result<Dataset> {
    let features = SAMPLE
        .iter()
        .map(|&(country, lon, lat, arrivals)| {
            let mut properties = JsonObject::new();
            properties.insert("Country".into(), JsonValue::String(country.into()));
            for year in range.first()..=range.last() {
                let slot = (year.saturating_sub(SAMPLE_FIRST_YEAR) as usize).min(arrivals.len() - 1);
                let value = arrivals[slot] as f64 * 1000.0;
                properties.insert(year.to_string(), JsonValue::String(group_thousands(value)));
            }
            Feature::new(country, lon, lat, properties)
        })
        .collect();

    Dataset::new(features, range)
}
