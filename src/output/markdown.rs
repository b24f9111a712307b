//! Markdown report generation
//!
//! The bundled renderer used when no other renderer is plugged in.

use crate::analyzers::ai::{Generated, Suggestions};
use crate::analyzers::domain_trust::{AgeYears, DnsHealth, SslStatus};
use crate::fetch::ProbeOutcome;
use crate::orchestrator::AnalysisResult;
use crate::output::traits::{RenderResult, ReportRenderer};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Broken links listed before the rest are summarized
const MAX_LISTED_LINKS: usize = 50;

/// Renders analyses as Markdown
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn content_type(&self) -> &'static str {
        "text/markdown; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, result: &AnalysisResult) -> RenderResult<Vec<u8>> {
        Ok(format_markdown_report(result).into_bytes())
    }
}

/// Renders a report and writes it to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(RenderError)` - Rendering or writing failed
pub fn write_report(
    renderer: &dyn ReportRenderer,
    result: &AnalysisResult,
    output_path: &Path,
) -> RenderResult<()> {
    let bytes = renderer.render(result)?;

    let mut file = File::create(output_path)?;
    file.write_all(&bytes)?;

    Ok(())
}

/// Formats an analysis as a Markdown document
pub fn format_markdown_report(result: &AnalysisResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Website Analysis: {}\n\n", result.url));

    // Run metadata
    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Analysis ID**: {}\n", result.analysis_id));
    md.push_str(&format!(
        "- **Analyzed**: {}\n",
        result.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Language**: {}\n", result.language.name()));
    if let Some(final_url) = &result.final_url {
        md.push_str(&format!("- **Final URL**: {}\n", final_url));
    }
    if let Some(error) = &result.fetch_error {
        md.push_str(&format!("- **Fetch Error**: {}\n", error));
    }
    md.push_str(&format!("- **SEO Score**: {}/100\n\n", result.seo.score));

    // SEO
    let seo = &result.seo;
    md.push_str("## SEO\n\n");
    if let Some(error) = &seo.error {
        md.push_str(&format!("_Unavailable: {}_\n\n", error));
    } else {
        md.push_str(&format!(
            "- **Title**: {}\n",
            seo.title.as_deref().unwrap_or("(missing)")
        ));
        md.push_str(&format!(
            "- **Meta Description**: {}\n",
            seo.meta_description.as_deref().unwrap_or("(missing)")
        ));
        md.push_str(&format!("- **H1 Headings**: {}\n", seo.headings.h1.len()));
        md.push_str(&format!(
            "- **Links**: {} internal, {} external, {} broken\n",
            seo.internal_link_count, seo.external_link_count, seo.broken_link_count
        ));
        md.push_str(&format!(
            "- **Images**: {} total, {} without usable alt text\n",
            seo.images.total, seo.image_alt_issues
        ));
        md.push_str(&format!(
            "- **Content**: {} words\n",
            seo.content_length.words
        ));
        if let Some(present) = seo.robots_txt_present {
            md.push_str(&format!("- **robots.txt**: {}\n", yes_no(present)));
        }
        if let Some(present) = seo.sitemap_present {
            md.push_str(&format!("- **Sitemap**: {}\n", yes_no(present)));
        }
        if let Some(allowed) = seo.crawl_allowed {
            md.push_str(&format!(
                "- **Crawlable**: {}\n",
                if allowed { "yes" } else { "no, blocked by robots.txt" }
            ));
        }
        md.push('\n');

        if !seo.keyword_density.is_empty() {
            md.push_str("### Keyword Density\n\n");
            md.push_str("| Keyword | Density |\n");
            md.push_str("|---------|---------|\n");
            for (word, density) in seo.keyword_density.iter() {
                md.push_str(&format!("| {} | {:.2}% |\n", word, density));
            }
            md.push('\n');
        }

        let broken: Vec<_> = seo.links.iter().filter(|l| l.is_broken).collect();
        if !broken.is_empty() {
            md.push_str("### Broken Links\n\n");
            md.push_str("| URL | Result |\n");
            md.push_str("|-----|--------|\n");
            for link in broken.iter().take(MAX_LISTED_LINKS) {
                let outcome = match &link.status_or_error {
                    ProbeOutcome::Status(status) => status.to_string(),
                    ProbeOutcome::Error(error) => error.clone(),
                    ProbeOutcome::Skipped => "skipped".to_string(),
                };
                md.push_str(&format!("| {} | {} |\n", link.url, outcome));
            }
            if broken.len() > MAX_LISTED_LINKS {
                md.push_str(&format!(
                    "\n... and {} more\n",
                    broken.len() - MAX_LISTED_LINKS
                ));
            }
            md.push('\n');
        }

        push_list(&mut md, "### Improvement Tips", &seo.tips);
    }

    // UX
    md.push_str("## User Experience\n\n");
    if let Some(error) = &result.ux.error {
        md.push_str(&format!("_Unavailable: {}_\n\n", error));
    } else {
        push_list(&mut md, "### Issues", &result.ux.issues);
        push_list(&mut md, "### Suggestions", &result.ux.suggestions);
    }

    // Domain trust
    let domain = &result.domain_trust;
    md.push_str("## Domain Trust\n\n");
    md.push_str(&format!("- **Domain**: {}\n", domain.domain));
    md.push_str(&format!(
        "- **Age**: {}\n",
        match domain.age_years {
            AgeYears::Known(years) => format!("{} year(s)", years),
            AgeYears::Unknown => "unknown".to_string(),
        }
    ));
    md.push_str(&format!(
        "- **TLS**: {}\n",
        match &domain.ssl_status {
            SslStatus::Valid { expires_in_days } =>
                format!("valid, expires in {} day(s)", expires_in_days),
            SslStatus::Invalid { reason } => format!("invalid ({})", reason),
            SslStatus::Unknown { reason } => format!("unknown ({})", reason),
        }
    ));
    md.push_str(&format!(
        "- **DNS**: {}\n",
        match &domain.dns_health {
            DnsHealth::Healthy { addresses } => format!("resolves to {}", addresses.join(", ")),
            DnsHealth::Unresolvable => "unresolvable".to_string(),
            DnsHealth::Unknown { reason } => format!("unknown ({})", reason),
        }
    ));
    md.push_str("- **Blacklist**: unknown\n\n");

    // Page speed
    let speed = &result.page_speed;
    md.push_str("## Page Speed\n\n");
    md.push_str("| Category | Score |\n");
    md.push_str("|----------|-------|\n");
    md.push_str(&format!("| Performance | {} |\n", speed.category_scores.performance));
    md.push_str(&format!("| Accessibility | {} |\n", speed.category_scores.accessibility));
    md.push_str(&format!("| Best Practices | {} |\n", speed.category_scores.best_practices));
    md.push_str(&format!("| SEO | {} |\n\n", speed.category_scores.seo));

    let vitals = &speed.core_web_vitals;
    md.push_str(&format!(
        "- **LCP**: {}\n- **CLS**: {}\n- **TBT**: {}\n- **FCP**: {}\n- **Speed Index**: {}\n",
        vitals.largest_contentful_paint,
        vitals.cumulative_layout_shift,
        vitals.total_blocking_time,
        vitals.first_contentful_paint,
        vitals.speed_index
    ));
    md.push_str(&format!("- **Full report**: {}\n\n", speed.report_link));
    match speed.issues.value() {
        Some(issues) => push_list(&mut md, "### Audit Issues", issues),
        None => md.push_str("### Audit Issues\n\nN/A\n\n"),
    }

    // AI
    let ai = &result.ai_insight;
    md.push_str("## AI Insight\n\n");
    md.push_str("### Summary\n\n");
    md.push_str(&format!("{}\n\n", ai.summary));
    match &ai.seo_suggestions {
        Suggestions::List(items) => push_list(&mut md, "### SEO Suggestions", items),
        Suggestions::Unavailable(reason) => {
            md.push_str(&format!("### SEO Suggestions\n\n{}\n\n", reason));
        }
    }
    md.push_str("### Content & Tone\n\n");
    md.push_str(&format!("{}\n\n", ai.content_tone));

    // Recommendations
    let recs = &result.ai_recommendations;
    md.push_str("## Recommendations\n\n");
    match &recs.adsense_readiness {
        Generated::Ready(readiness) => {
            md.push_str("### AdSense Readiness\n\n");
            md.push_str(&format!("{}\n\n", readiness.assessment));
            push_list(&mut md, "#### Areas to Improve", &readiness.improvement_areas);
        }
        Generated::Unavailable(reason) => {
            md.push_str(&format!("### AdSense Readiness\n\n{}\n\n", reason));
        }
    }
    match &recs.broken_link_suggestions {
        Generated::Ready(items) if items.is_empty() => {
            md.push_str("### Broken Link Fixes\n\nNo broken links to fix.\n\n");
        }
        Generated::Ready(items) => push_list(&mut md, "### Broken Link Fixes", items),
        Generated::Unavailable(reason) => {
            md.push_str(&format!("### Broken Link Fixes\n\n{}\n\n", reason));
        }
    }
    match &recs.seo_rewrites {
        Generated::Ready(rewrites) => {
            push_list(&mut md, "### Suggested Titles", &rewrites.titles);
            push_list(&mut md, "### Suggested Meta Descriptions", &rewrites.meta_descriptions);
        }
        Generated::Unavailable(reason) => {
            md.push_str(&format!("### Suggested Titles\n\n{}\n\n", reason));
        }
    }
    match &recs.content_refinement {
        Generated::Ready(refinement) => {
            md.push_str("### Refined Text\n\n");
            md.push_str(&format!("> {}\n\n", refinement.refined_text.replace('\n', "\n> ")));
            push_list(&mut md, "#### Further Suggestions", &refinement.suggestions);
        }
        Generated::Unavailable(reason) => {
            md.push_str(&format!("### Refined Text\n\n{}\n", reason));
        }
    }

    md
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn push_list(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    md.push_str(heading);
    md.push_str("\n\n");
    for item in items {
        md.push_str(&format!("- {}\n", item));
    }
    md.push('\n');
}
