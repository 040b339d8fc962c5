//! 模板缓存与渲染
//!
//! 启动时为每个页面构建一个独立的 handlebars 注册表：基础布局注册为 `base`
//! 局部模板，`partials/` 下的文件按文件名注册为局部模板，页面片段本身以文件名
//! 作为模板名。构建完成后缓存只读。

mod helpers;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;

use crate::models::Snippet;

pub use helpers::format_human_date;

const TEMPLATE_SUFFIX: &str = ".tmpl.html";
const BASE_LAYOUT: &str = "base";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile template: {0}")]
    Compile(#[from] handlebars::TemplateError),
    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
    #[error("the template {0} does not exist")]
    NotFound(String),
    #[error("no page templates found in {0}")]
    NoPages(PathBuf),
}

/// 传递给每个页面的视图模型
#[derive(Debug, Serialize)]
pub struct TemplateData<F> {
    pub current_year: i32,
    pub snippet: Option<Snippet>,
    pub snippets: Option<Vec<Snippet>>,
    pub form: Option<F>,
    pub flash: String,
    pub is_authenticated: bool,
}

impl<F> TemplateData<F> {
    pub fn new(current_year: i32, flash: String, is_authenticated: bool) -> Self {
        Self {
            current_year,
            snippet: None,
            snippets: None,
            form: None,
            flash,
            is_authenticated,
        }
    }

    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = Some(snippets);
        self
    }

    pub fn with_form(mut self, form: F) -> Self {
        self.form = Some(form);
        self
    }
}

/// 页面名到已编译模板的只读索引
pub struct TemplateCache {
    pages: HashMap<String, Handlebars<'static>>,
}

impl fmt::Debug for TemplateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pages: Vec<&String> = self.pages.keys().collect();
        pages.sort();
        f.debug_struct("TemplateCache").field("pages", &pages).finish()
    }
}

impl TemplateCache {
    /// 从模板目录构建缓存，任何一个页面失败都会使整个构建失败
    ///
    /// 目录结构：`base.tmpl.html`、`partials/*.tmpl.html`、`pages/*.tmpl.html`。
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();

        let base = read_template(&dir.join(format!("{BASE_LAYOUT}{TEMPLATE_SUFFIX}")))?;

        let partials_dir = dir.join("partials");
        let mut partials = Vec::new();
        if partials_dir.is_dir() {
            for path in template_files(&partials_dir)? {
                let name = template_stem(&path);
                partials.push((name, read_template(&path)?));
            }
        }

        let pages_dir = dir.join("pages");
        let page_paths = template_files(&pages_dir)?;
        if page_paths.is_empty() {
            return Err(TemplateError::NoPages(pages_dir));
        }

        let mut pages = HashMap::with_capacity(page_paths.len());
        for path in page_paths {
            let page_name = file_name(&path);

            let mut registry = Handlebars::new();
            // 局部模板不自动缩进，否则 <pre> 中的多行内容会被插入空白
            registry.set_prevent_indent(true);
            helpers::register_helpers(&mut registry);
            registry.register_partial(BASE_LAYOUT, base.as_str())?;
            for (name, source) in &partials {
                registry.register_partial(name, source.as_str())?;
            }
            registry.register_template_string(&page_name, read_template(&path)?)?;

            tracing::debug!("Compiled template {}", page_name);
            pages.insert(page_name, registry);
        }

        Ok(Self { pages })
    }

    /// 将页面完整渲染到内存缓冲区
    ///
    /// 只有渲染完全成功才返回内容，调用方据此再写出状态码与响应体。
    pub fn render<T: Serialize>(&self, page: &str, data: &T) -> Result<String, TemplateError> {
        let registry = self
            .pages
            .get(page)
            .ok_or_else(|| TemplateError::NotFound(page.to_owned()))?;

        Ok(registry.render(page, data)?)
    }
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn template_files(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let entries = fs::read_dir(dir).map_err(|source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && file_name(&path).ends_with(TEMPLATE_SUFFIX) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn template_stem(path: &Path) -> String {
    let name = file_name(path);
    name.strip_suffix(TEMPLATE_SUFFIX)
        .map(str::to_owned)
        .unwrap_or(name)
}
