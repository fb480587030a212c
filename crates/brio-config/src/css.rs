use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssOptions {
    #[serde(default)]
    pub modules: CssModulesOptions,

    #[serde(default)]
    pub preprocessor_options: PreprocessorOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssModulesOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locals_convention: Option<LocalsConvention>,
}

/// How CSS-module class names are exposed to scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocalsConvention {
    CamelCase,
    CamelCaseOnly,
    Dashes,
    DashesOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessorOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scss: Option<ScssOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScssOptions {
    /// Source prepended to every stylesheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<String>,
}
