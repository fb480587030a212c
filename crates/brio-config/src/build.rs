//! Production build options handed to the bundler.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::chunks::ManualChunks;
use crate::error::{ConfigError, Result};
use crate::mode::BuildModeFlags;

/// Placeholders recognised in output file-name templates.
pub const TEMPLATE_PLACEHOLDERS: [&str; 3] = ["name", "hash", "ext"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    #[serde(default = "default_target")]
    pub target: String,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// `None` follows the build mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sourcemap: Option<bool>,

    #[serde(default)]
    pub minify: bool,

    /// In KiB.
    #[serde(default = "default_chunk_size_warning_limit")]
    pub chunk_size_warning_limit: u64,

    #[serde(default = "default_true")]
    pub css_code_split: bool,

    #[serde(default)]
    pub report_compressed_size: bool,

    #[serde(default)]
    pub rollup_options: RollupOptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terser_options: Option<TerserOptions>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            target: default_target(),
            out_dir: default_out_dir(),
            assets_dir: default_assets_dir(),
            sourcemap: None,
            minify: false,
            chunk_size_warning_limit: default_chunk_size_warning_limit(),
            css_code_split: true,
            report_compressed_size: false,
            rollup_options: RollupOptions::default(),
            terser_options: None,
        }
    }
}

fn default_target() -> String {
    "es2020".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_chunk_size_warning_limit() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupOptions {
    #[serde(default)]
    pub output: OutputOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(default = "default_chunk_file_names")]
    pub chunk_file_names: String,

    #[serde(default = "default_entry_file_names")]
    pub entry_file_names: String,

    #[serde(default = "default_asset_file_names")]
    pub asset_file_names: String,

    #[serde(default, skip_serializing_if = "ManualChunks::is_empty")]
    pub manual_chunks: ManualChunks,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            chunk_file_names: default_chunk_file_names(),
            entry_file_names: default_entry_file_names(),
            asset_file_names: default_asset_file_names(),
            manual_chunks: ManualChunks::default(),
        }
    }
}

fn default_chunk_file_names() -> String {
    "assets/js/[name]-[hash].js".to_string()
}

fn default_entry_file_names() -> String {
    "assets/js/[name]-[hash].js".to_string()
}

fn default_asset_file_names() -> String {
    "assets/[ext]/[name]-[hash].[ext]".to_string()
}

impl OutputOptions {
    pub fn validate(&self) -> Result<()> {
        validate_template("build.rollupOptions.output.chunkFileNames", &self.chunk_file_names)?;
        validate_template("build.rollupOptions.output.entryFileNames", &self.entry_file_names)?;
        validate_template("build.rollupOptions.output.assetFileNames", &self.asset_file_names)?;
        self.manual_chunks.validate()
    }
}

/// Compress options use terser's own snake_case names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerserOptions {
    #[serde(default)]
    pub compress: CompressOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_console: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_debugger: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pure_funcs: Option<Vec<String>>,
}

/// Build options with every mode-conditional value decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBuild {
    pub target: String,
    pub out_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub sourcemap: bool,
    pub minify: bool,
    pub chunk_size_warning_limit: u64,
    pub css_code_split: bool,
    pub report_compressed_size: bool,
    pub rollup_options: RollupOptions,
    pub terser_options: ResolvedTerser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTerser {
    pub compress: ResolvedCompress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCompress {
    pub drop_console: bool,
    pub drop_debugger: bool,
    pub pure_funcs: Vec<String>,
}

impl BuildOptions {
    pub fn validate(&self) -> Result<()> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "build.target cannot be empty".to_string(),
                hint: Some("Use an ECMAScript target such as 'es2020'".to_string()),
            });
        }
        if self.out_dir.as_os_str().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "build.outDir cannot be empty".to_string(),
                hint: None,
            });
        }
        if self.assets_dir.is_absolute() {
            return Err(ConfigError::InvalidValue {
                field: "build.assetsDir".to_string(),
                hint: Some("assetsDir is relative to outDir".to_string()),
            });
        }
        self.rollup_options.output.validate()
    }

    /// True when compress options are declared but minification is off, so
    /// the bundler will never apply them.
    pub fn has_inert_terser_options(&self) -> bool {
        !self.minify && self.terser_options.is_some()
    }

    /// Apply mode-derived defaults where the document is silent.
    pub fn resolve(&self, flags: &BuildModeFlags, root: &Path) -> Result<ResolvedBuild> {
        self.validate()?;

        let compress = self
            .terser_options
            .as_ref()
            .map(|t| t.compress.clone())
            .unwrap_or_default();

        let out_dir = if self.out_dir.is_absolute() {
            self.out_dir.clean()
        } else {
            root.join(&self.out_dir).clean()
        };

        Ok(ResolvedBuild {
            target: self.target.clone(),
            out_dir,
            assets_dir: self.assets_dir.clone(),
            sourcemap: self.sourcemap.unwrap_or(flags.sourcemap),
            minify: self.minify,
            chunk_size_warning_limit: self.chunk_size_warning_limit,
            css_code_split: self.css_code_split,
            report_compressed_size: self.report_compressed_size,
            rollup_options: self.rollup_options.clone(),
            terser_options: ResolvedTerser {
                compress: ResolvedCompress {
                    drop_console: compress.drop_console.unwrap_or(flags.drop_console),
                    drop_debugger: compress.drop_debugger.unwrap_or(flags.drop_debugger),
                    pure_funcs: compress
                        .pure_funcs
                        .unwrap_or_else(|| flags.pure_funcs.clone()),
                },
            },
        })
    }
}

/// Reject placeholders other than `[name]`, `[hash]` and `[ext]`.
///
/// A bracketed segment only counts as a placeholder when it is a bare word;
/// other brackets are literal text.
pub fn validate_template(field: &str, template: &str) -> Result<()> {
    if template.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            hint: Some("file name template cannot be empty".to_string()),
        });
    }

    for placeholder in placeholders(template) {
        if !TEMPLATE_PLACEHOLDERS.contains(&placeholder) {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                hint: Some(format!(
                    "unknown placeholder '[{}]' (supported: [name], [hash], [ext])",
                    placeholder
                )),
            });
        }
    }

    Ok(())
}

/// Substitute the three supported placeholders.
pub fn render_template(template: &str, name: &str, hash: &str, ext: &str) -> String {
    template
        .replace("[name]", name)
        .replace("[hash]", hash)
        .replace("[ext]", ext)
}

fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    template.split('[').skip(1).filter_map(|segment| {
        let (inner, _) = segment.split_once(']')?;
        let is_word = !inner.is_empty()
            && inner
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':');
        is_word.then_some(inner)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::BuildMode;

    #[test]
    fn defaults_match_documented_values() {
        let build = BuildOptions::default();
        assert_eq!(build.target, "es2020");
        assert_eq!(build.out_dir, PathBuf::from("dist"));
        assert_eq!(build.assets_dir, PathBuf::from("assets"));
        assert!(!build.minify);
        assert_eq!(build.chunk_size_warning_limit, 2000);
        assert!(build.css_code_split);
        assert!(!build.report_compressed_size);
    }

    #[test]
    fn production_mode_drops_console_and_debugger() {
        let build = BuildOptions::default();
        let resolved = build
            .resolve(&BuildMode::Production.flags(), Path::new("/app"))
            .unwrap();
        let compress = &resolved.terser_options.compress;
        assert!(compress.drop_console);
        assert!(compress.drop_debugger);
        assert_eq!(compress.pure_funcs, vec!["console.log".to_string()]);
        assert!(!resolved.sourcemap);
        assert_eq!(resolved.out_dir, PathBuf::from("/app/dist"));
    }

    #[test]
    fn development_mode_keeps_console() {
        let resolved = BuildOptions::default()
            .resolve(&BuildMode::Development.flags(), Path::new("/app"))
            .unwrap();
        let compress = &resolved.terser_options.compress;
        assert!(!compress.drop_console);
        assert!(!compress.drop_debugger);
        assert!(compress.pure_funcs.is_empty());
        assert!(resolved.sourcemap);
    }

    #[test]
    fn explicit_values_override_mode() {
        let build = BuildOptions {
            sourcemap: Some(true),
            terser_options: Some(TerserOptions {
                compress: CompressOptions {
                    drop_console: Some(false),
                    ..Default::default()
                },
            }),
            ..Default::default()
        };
        let resolved = build
            .resolve(&BuildMode::Production.flags(), Path::new("/app"))
            .unwrap();
        assert!(resolved.sourcemap);
        assert!(!resolved.terser_options.compress.drop_console);
        assert!(resolved.terser_options.compress.drop_debugger);
    }

    #[test]
    fn inert_terser_options_are_detected() {
        let mut build = BuildOptions {
            terser_options: Some(TerserOptions::default()),
            ..Default::default()
        };
        assert!(build.has_inert_terser_options());
        build.minify = true;
        assert!(!build.has_inert_terser_options());
    }

    #[test]
    fn template_placeholders() {
        assert!(validate_template("f", "assets/js/[name]-[hash].js").is_ok());
        assert!(validate_template("f", "assets/[ext]/[name]-[hash].[ext]").is_ok());

        let err = validate_template("f", "assets/[name]-[contenthash].js").unwrap_err();
        assert!(err.to_string().contains("[contenthash]"));
    }

    #[test]
    fn renders_template() {
        assert_eq!(
            render_template("assets/[ext]/[name]-[hash].[ext]", "logo", "a1b2c3", "png"),
            "assets/png/logo-a1b2c3.png"
        );
    }
}
