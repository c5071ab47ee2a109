use quantdesk_core::project::entity::Language;
use quantdesk_core::project::error::ProjectError;
use quantdesk_core::project::port::{ProjectConfigStore, ProjectScaffolder};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const PYTHON_MAIN: &str = r#"from AlgorithmImports import *


class {class_name}(QCAlgorithm):

    def Initialize(self):
        self.SetStartDate(2013, 10, 7)
        self.SetEndDate(2013, 10, 11)
        self.SetCash(100000)
        self.AddEquity("SPY", Resolution.Minute)

    def OnData(self, data):
        if not self.Portfolio.Invested:
            self.SetHoldings("SPY", 1)
"#;

const CSHARP_MAIN: &str = r#"using QuantConnect.Data;

namespace QuantConnect.Algorithm.CSharp
{
    public class {class_name} : QCAlgorithm
    {
        public override void Initialize()
        {
            SetStartDate(2013, 10, 7);
            SetEndDate(2013, 10, 11);
            SetCash(100000);
            AddEquity("SPY", Resolution.Minute);
        }

        public override void OnData(Slice data)
        {
            if (!Portfolio.Invested)
            {
                SetHoldings("SPY", 1);
            }
        }
    }
}
"#;

/// 生成 research notebook 的最小合法结构
fn research_notebook(language: Language) -> Value {
    let (kernel, display_name, kernel_language) = match language {
        Language::Python => ("python3", "Python 3", "python"),
        Language::CSharp => ("csharp", "C#", "C#"),
    };

    json!({
        "cells": [],
        "metadata": {
            "kernelspec": {"name": kernel, "display_name": display_name, "language": kernel_language}
        },
        "nbformat": 4,
        "nbformat_minor": 2
    })
}

/// 由项目路径最后一段推导出算法类名，仅保留字母数字并转为 PascalCase。
fn class_name(name: &str) -> String {
    let last = name.rsplit('/').next().unwrap_or(name);
    let mut out = String::new();
    for word in last.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "Algorithm");
    }
    out
}

/// # Summary
/// ProjectScaffolder 的模板实现，在根目录下生成入口文件、notebook 和侧车配置。
///
/// # Invariants
/// * 目标目录已存在时拒绝创建，不会覆盖任何已有文件。
pub struct TemplateScaffolder {
    root: PathBuf,
    config_store: Arc<dyn ProjectConfigStore>,
}

impl TemplateScaffolder {
    pub fn new(root: impl Into<PathBuf>, config_store: Arc<dyn ProjectConfigStore>) -> Self {
        Self {
            root: root.into(),
            config_store,
        }
    }
}

impl ProjectScaffolder for TemplateScaffolder {
    /// # Logic
    /// 1. 检查目标目录是否存在，存在则返回 Conflict。
    /// 2. 按语言写入入口文件与 `research.ipynb`。
    /// 3. 写入侧车配置 (language / description / parameters)。
    fn create_project(&self, name: &str, language: Language) -> Result<PathBuf, ProjectError> {
        let project_dir = self.root.join(name);
        if project_dir.exists() {
            return Err(ProjectError::Conflict(format!(
                "A project named '{}' already exists",
                name
            )));
        }

        fs::create_dir_all(&project_dir)?;

        let class_name = class_name(name);
        let (main_file, template) = match language {
            Language::Python => ("main.py", PYTHON_MAIN),
            Language::CSharp => ("Main.cs", CSHARP_MAIN),
        };
        fs::write(project_dir.join(main_file), template.replace("{class_name}", &class_name))?;

        let notebook = serde_json::to_string_pretty(&research_notebook(language))
            .map_err(|e| ProjectError::Config(e.to_string()))?;
        fs::write(project_dir.join("research.ipynb"), notebook)?;

        self.config_store
            .set(&project_dir, "language", Value::from(language.config_name()))?;
        self.config_store.set(&project_dir, "description", Value::from(""))?;
        self.config_store.set(&project_dir, "parameters", json!({}))?;

        tracing::info!("Created {} project '{}'", language, name);
        Ok(project_dir)
    }
}
