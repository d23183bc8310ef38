//! Time-standards reference data and the resolvers that build lookup keys.
//!
//! - `table`: tier ladders under a flat `(era, bracket, gender, course, event)` key
//! - `event`: course-dependent event remapping (500y ≡ 400m, ...)
//! - `age`: era and age-bracket selection, age from birthdate

pub mod age;
pub mod event;
pub mod table;

pub use age::*;
pub use event::*;
pub use table::*;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::StandardsTable;

    /// A trimmed two-era standards file in the on-disk format.
    pub const STANDARDS_JSON: &str = r#"{
      "2021-2024": {
        "13-14": {
          "Male": {
            "SCY": {
              "100 Free": { "AAAA": "52.49", "AAA": "54.59", "AA": "57.49", "A": "1:00.99", "BB": "1:04.39", "B": "1:09.99" }
            }
          }
        }
      },
      "2024-2028": {
        "13-14": {
          "Male": {
            "SCY": {
              "100 Free": { "AAAA": "53.99", "AAA": "55.99", "AA": "58.99", "A": "1:02.49", "BB": "1:05.99", "B": "1:11.59" },
              "500 Free": { "AAAA": "4:51.19", "AAA": "5:03.69", "AA": "5:16.19", "A": "5:28.69" },
              "200 IM": { "AAAA": "2:04.19", "AA": "2:14.59", "B": "2:35.39" }
            },
            "LCM": {
              "400 Free": { "AAAA": "4:29.59", "AAA": "4:41.29", "AA": "4:52.99", "A": "5:04.69" },
              "1500 Free": { "AAAA": "18:02.19", "A": "20:23.49" },
              "100 Free": { "AAAA": 61.29, "AAA": 63.89, "AA": 66.49 }
            }
          }
        },
        "15-16": {
          "Male": {
            "SCY": {
              "100 Free": { "AAAA": "50.19", "AAA": "52.09", "AA": "54.09", "A": "56.09", "BB": "58.79", "B": "1:02.89" },
              "200 Back": { "AAAA": "1:55.29", "AAA": "2:00.59", "AA": "2:05.89", "A": "2:11.19" }
            }
          }
        }
      }
    }"#;

    pub fn table() -> StandardsTable {
        crate::io::parse_standards(STANDARDS_JSON).unwrap()
    }
}
