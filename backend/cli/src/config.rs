use std::path::{Path, PathBuf};

use anyhow::Result;
use ocrflow_config::{
    config_dir, config_file_path, load_and_prepare, validate, IngestConfig, OcrflowConfig,
    RoutingConfig, SinkConfig, SinkKind, ValidationReport,
};

/// Command-line flags that take precedence over the file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold_mb: Option<f64>,
    pub sink: Option<SinkKind>,
    pub sink_path: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(&self, mut config: OcrflowConfig) -> OcrflowConfig {
        if let Some(threshold) = self.threshold_mb {
            config
                .routing
                .get_or_insert_with(RoutingConfig::default)
                .threshold_mb = Some(threshold);
        }
        if let Some(kind) = self.sink {
            config.sink.get_or_insert_with(SinkConfig::default).kind = Some(kind);
        }
        if let Some(path) = &self.sink_path {
            config.sink.get_or_insert_with(SinkConfig::default).path =
                Some(path.display().to_string());
        }
        if let Some(path) = &self.manifest {
            config.ingest.get_or_insert_with(IngestConfig::default).manifest =
                Some(path.display().to_string());
        }
        config
    }
}

/// Effective configuration: file, then environment, then flags.
///
/// Validation runs again after the flags are applied so the report
/// describes what will actually be used.
pub async fn resolve(
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<(OcrflowConfig, ValidationReport)> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()));
    let (config, _) = load_and_prepare(&path).await?;
    let config = overrides.apply(config);
    let report = validate(&config);
    Ok((config, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_file_values() {
        let file: OcrflowConfig = serde_yaml::from_str(
            "routing:\n  thresholdMb: 4\nsink:\n  kind: ndjson\n  path: /tmp/a.ndjson\n",
        )
        .unwrap();
        let flags = Overrides {
            threshold_mb: Some(0.5),
            sink: Some(SinkKind::Sqlite),
            sink_path: Some(PathBuf::from("/tmp/ocr.db")),
            manifest: None,
        };

        let cfg = flags.apply(file);
        assert_eq!(cfg.threshold_mb(), 0.5);
        assert_eq!(cfg.sink_kind(), SinkKind::Sqlite);
        assert_eq!(cfg.sink_path(), Some("/tmp/ocr.db"));
        assert_eq!(cfg.manifest(), None);
    }

    #[test]
    fn empty_flags_change_nothing() {
        let cfg = OcrflowConfig::default();
        assert_eq!(Overrides::default().apply(cfg.clone()), cfg);
    }

    #[tokio::test]
    async fn resolve_revalidates_after_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sink:\n  kind: stdout\n").unwrap();

        let flags = Overrides {
            sink: Some(SinkKind::Ndjson),
            ..Default::default()
        };
        let (cfg, report) = resolve(Some(&path), &flags).await.unwrap();
        assert_eq!(cfg.sink_kind(), SinkKind::Ndjson);
        // ndjson without a path is rejected.
        assert!(!report.is_valid());
    }
}
