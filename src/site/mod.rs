// Static site generator
//
// Turns a directory of markdown chapters into HTML pages using the
// `chapter.html` and `index.html` templates of a theme.

pub mod markdown;

pub use markdown::{CommonMark, MarkdownRenderer};

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::registry::is_hidden;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tera::{Context, Tera};
use walkdir::WalkDir;

static RE_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.*)$").unwrap());
static RE_H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##[ \t]+(.*)$").unwrap());

const CHAPTER_TEMPLATE: &str = "chapter.html";
const INDEX_TEMPLATE: &str = "index.html";

/// One markdown chapter, as templates see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Site-relative page url, `/<stem>.html`
    pub url: String,
    pub title: String,
    /// Second level headings with their anchors
    pub h2: Vec<Heading>,
    #[serde(skip)]
    pub source: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub title: String,
    pub url: String,
}

impl Chapter {
    /// Read title and sub-headings from a chapter's markdown
    pub fn from_markdown(path: &Path, markdown: &str) -> Result<Self> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let url = format!("/{}.html", stem);

        let title = RE_H1
            .captures(markdown)
            .map(|caps| caps[1].trim().to_string())
            .ok_or_else(|| Error::site(format!("markdown file has no h1: {}", path.display())))?;

        let h2 = RE_H2
            .captures_iter(markdown)
            .map(|caps| {
                let title = caps[1].trim().to_string();
                Heading {
                    url: format!("{}#{}", url, title.replace(' ', "-")),
                    title,
                }
            })
            .collect();

        Ok(Self {
            url,
            title,
            h2,
            source: path.to_path_buf(),
        })
    }
}

/// Summary of one site build
#[derive(Debug, Default)]
pub struct SiteReport {
    pub chapters: usize,
    pub files_copied: usize,
}

impl SiteReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} chapters, copied {} files",
            self.chapters, self.files_copied
        )
    }
}

/// Builds the static documentation site
pub struct SiteGenerator<M: MarkdownRenderer = CommonMark> {
    config: SiteConfig,
    markdown: M,
}

impl SiteGenerator<CommonMark> {
    pub fn new(config: SiteConfig) -> Self {
        Self::with_renderer(config, CommonMark::default())
    }
}

impl<M: MarkdownRenderer> SiteGenerator<M> {
    pub fn with_renderer(config: SiteConfig, markdown: M) -> Self {
        Self { config, markdown }
    }

    /// Rebuild the output directory from scratch
    pub fn generate(&self) -> Result<SiteReport> {
        let theme_dir = existing_dir(&self.config.theme_dir)?;
        let sources_dir = existing_dir(&self.config.sources_dir)?;
        let tera = self.load_templates(&theme_dir)?;

        let output_dir = &self.config.output_dir;
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)?;
        }
        fs::create_dir_all(output_dir)?;

        let mut report = SiteReport::default();

        let resources = theme_dir.join("resources");
        if resources.is_dir() {
            report.files_copied += copy_tree(&resources, output_dir)?;
        }
        let images = sources_dir.join("images");
        if images.is_dir() {
            report.files_copied += copy_tree(&images, output_dir)?;
        }

        let chapters = collect_chapters(&sources_dir)?;

        let mut context = Context::new();
        context.insert("chapters", &chapters);
        context.insert("title", &self.config.index_title);
        context.insert("root_path", &self.config.root_path);
        fs::write(
            output_dir.join("index.html"),
            tera.render(INDEX_TEMPLATE, &context)?,
        )?;

        for chapter in &chapters {
            let markdown = fs::read_to_string(&chapter.source)?;

            let mut context = Context::new();
            context.insert("chapters", &chapters);
            context.insert("content", &self.markdown.render(&markdown));
            context.insert(
                "title",
                &self.config.chapter_title.replace("{title}", &chapter.title),
            );
            context.insert("root_path", &self.config.root_path);
            context.insert("current_chapter", &chapter.url);

            let page = output_dir.join(chapter.url.trim_start_matches('/'));
            fs::write(page, tera.render(CHAPTER_TEMPLATE, &context)?)?;
            report.chapters += 1;
        }

        Ok(report)
    }

    fn load_templates(&self, theme_dir: &Path) -> Result<Tera> {
        let mut tera = Tera::default();
        for name in [CHAPTER_TEMPLATE, INDEX_TEMPLATE] {
            let path = theme_dir.join("templates").join(name);
            if !path.is_file() {
                return Err(Error::site(format!(
                    "template does not exist: {}",
                    path.display()
                )));
            }
            tera.add_template_file(&path, Some(name))?;
        }
        Ok(tera)
    }
}

fn existing_dir(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(Error::PathNotFound(path.to_path_buf()))
    }
}

/// Chapters from `<sources>/*.md`, sorted by file name
pub fn collect_chapters(sources_dir: &Path) -> Result<Vec<Chapter>> {
    let pattern = format!("{}/*.md", sources_dir.display());

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        paths.push(entry.map_err(|e| Error::Io(e.into_error()))?);
    }
    paths.sort();

    paths
        .iter()
        .map(|path| Chapter::from_markdown(path, &fs::read_to_string(path)?))
        .collect()
}

/// Copy `src` into `dst`, skipping dot entries; returns the number of files
fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
    {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::site(e.to_string()))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
