//! Control file reader.
//!
//! ケースの `system/controlDict` から終了時刻とアプリケーション名だけを読む。

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::domain::StatusError;

/// Control file location, relative to the case directory.
pub const CONTROL_FILE: &str = "system/controlDict";

const END_TIME_KEY: &str = "endTime";
const APPLICATION_KEY: &str = "application";

/// Raw result of scanning the control file; either key may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlDict {
    pub end_time: Option<f64>,
    pub application: Option<String>,
}

impl ControlDict {
    /// Scan lines until both keys have been seen.
    pub fn parse<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut dict = ControlDict::default();
        for line in reader.lines() {
            let line = line?;
            let mut tokens = line.split_whitespace();
            let (Some(key), Some(last)) = (tokens.next(), tokens.next_back()) else {
                continue;
            };
            let value = last.strip_suffix(';').unwrap_or(last);
            match key {
                END_TIME_KEY => {
                    if let Ok(end_time) = value.parse::<f64>() {
                        dict.end_time = Some(end_time);
                    }
                }
                APPLICATION_KEY => dict.application = Some(value.to_string()),
                _ => {}
            }
            if dict.end_time.is_some() && dict.application.is_some() {
                break;
            }
        }
        Ok(dict)
    }

    /// Both keys present and the end time usable as a divisor.
    pub fn settings(&self) -> Option<ControlSettings> {
        let end_time = self.end_time.filter(|t| t.is_finite() && *t > 0.0)?;
        let application = self.application.clone().filter(|a| !a.is_empty())?;
        Some(ControlSettings {
            end_time,
            application,
        })
    }
}

/// Settings a job needs from its control file.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSettings {
    pub end_time: f64,
    pub application: String,
}

impl ControlSettings {
    /// `<directory>/log.<application>`
    pub fn log_path(&self, directory: &Path) -> PathBuf {
        directory.join(format!("log.{}", self.application))
    }
}

pub fn control_path(directory: &Path) -> PathBuf {
    directory.join(CONTROL_FILE)
}

/// Read the control file of the case in `directory`.
///
/// A missing file is `ConfigNotFound`; missing keys are not an error here.
pub fn read_control(directory: &Path) -> Result<ControlDict, StatusError> {
    let path = control_path(directory);
    let file = File::open(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StatusError::ConfigNotFound { path: path.clone() },
        _ => StatusError::Io {
            path: path.clone(),
            source: e,
        },
    })?;
    ControlDict::parse(BufReader::new(file)).map_err(|source| StatusError::Io { path, source })
}

/// Read the control file and require both settings.
pub fn load_settings(directory: &Path) -> Result<ControlSettings, StatusError> {
    read_control(directory)?
        .settings()
        .ok_or_else(|| StatusError::ConfigIncomplete {
            path: control_path(directory),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    fn parse(text: &str) -> ControlDict {
        ControlDict::parse(text.as_bytes()).unwrap()
    }

    #[rstest]
    #[case::plain("application icoFoam;\nendTime 100;\n")]
    #[case::reversed("endTime 100;\napplication icoFoam;\n")]
    #[case::padded(
        "FoamFile\n{\n    version 2.0;\n}\n\napplication     icoFoam;\n\nstartFrom startTime;\nendTime         100;\n"
    )]
    #[case::no_semicolon("application icoFoam\nendTime 100\n")]
    fn reads_both_keys(#[case] text: &str) {
        let dict = parse(text);
        assert_eq!(dict.end_time, Some(100.0));
        assert_eq!(dict.application.as_deref(), Some("icoFoam"));
    }

    #[test]
    fn stops_after_both_keys_found() {
        let dict = parse("endTime 100;\napplication icoFoam;\nendTime 5;\n");
        assert_eq!(dict.end_time, Some(100.0));
    }

    #[test]
    fn skips_malformed_lines() {
        let dict = parse("endTime\napplication\n;\nendTime abc;\napplication simpleFoam;\n");
        assert_eq!(dict.end_time, None);
        assert_eq!(dict.application.as_deref(), Some("simpleFoam"));
        assert!(dict.settings().is_none());
    }

    #[test]
    fn other_keys_sharing_a_prefix_are_ignored() {
        let dict = parse("endTimeX 3;\nstopAt endTime;\napplication pimpleFoam;\nendTime 0.5;\n");
        assert_eq!(dict.end_time, Some(0.5));
    }

    #[rstest]
    #[case::zero("endTime 0;\napplication icoFoam;\n")]
    #[case::negative("endTime -1;\napplication icoFoam;\n")]
    fn non_positive_end_time_is_unusable(#[case] text: &str) {
        assert!(parse(text).settings().is_none());
    }

    #[test]
    fn log_path_follows_application() {
        let settings = ControlSettings {
            end_time: 1.0,
            application: "icoFoam".into(),
        };
        assert_eq!(
            settings.log_path(Path::new("/cases/cavity")),
            PathBuf::from("/cases/cavity/log.icoFoam")
        );
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_control(dir.path()).unwrap_err();
        assert!(matches!(err, StatusError::ConfigNotFound { .. }));
    }

    #[test]
    fn incomplete_file_is_config_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("system")).unwrap();
        fs::write(dir.path().join(CONTROL_FILE), "application icoFoam;\n").unwrap();

        let err = load_settings(dir.path()).unwrap_err();
        assert!(matches!(err, StatusError::ConfigIncomplete { .. }));
        assert!(err.is_config());
    }

    #[test]
    fn loads_settings_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("system")).unwrap();
        fs::write(
            dir.path().join(CONTROL_FILE),
            "application icoFoam;\nendTime 0.5;\n",
        )
        .unwrap();

        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.end_time, 0.5);
        assert_eq!(settings.application, "icoFoam");
    }
}
