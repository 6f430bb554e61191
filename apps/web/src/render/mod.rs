//! Server-side HTML for the match page, rendered with dioxus-ssr.
//!
//! Text from the visitor or the upstream service only reaches the markup
//! through `rsx!` interpolation, which escapes it.

use dioxus::dioxus_core::VirtualDom;
use dioxus::prelude::*;

use crate::form::view::{FormView, ResultView};

pub const NO_MATCHED_SKILLS: &str = "No matching skills found";
pub const ALL_SKILLS_PRESENT: &str = "You have all required skills!";

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Renders the complete page for one visitor.
pub fn render_page(view: &FormView) -> String {
    let mut dom = VirtualDom::new_with_props(MatchPage, MatchPageProps { view: view.clone() });
    dom.rebuild_in_place();
    format!("<!DOCTYPE html>{}", dioxus_ssr::render(&dom))
}

#[component]
fn MatchPage(view: FormView) -> Element {
    rsx! {
        html {
            lang: "en",
            head {
                meta { charset: "utf-8" }
                meta { name: "viewport", content: "width=device-width, initial-scale=1" }
                title { "Recruitify AI" }
                script { src: TAILWIND_CDN }
            }
            body {
                class: "min-h-screen bg-slate-900 py-8 px-4",
                main {
                    class: "max-w-7xl mx-auto bg-white rounded-3xl shadow-2xl p-8 md:p-12",
                    header {
                        class: "text-center mb-12",
                        h1 { class: "text-5xl md:text-6xl font-black text-purple-600 mb-4", "Recruitify AI" }
                        p {
                            class: "text-xl text-gray-600 font-medium",
                            "Discover your perfect job match with AI-powered resume analysis"
                        }
                    }
                    MatchFormSection { view: view.clone() }
                    if let Some(result) = view.result.clone() {
                        ResultSection { result }
                    }
                }
            }
        }
    }
}

#[component]
fn MatchFormSection(view: FormView) -> Element {
    rsx! {
        form {
            method: "post",
            action: "/match",
            class: "space-y-8",
            div {
                class: "grid md:grid-cols-2 gap-8",
                InputPanel {
                    id: "resume",
                    name: "resumeText",
                    label: "Your Resume",
                    placeholder: "Paste your resume text here...",
                    value: view.resume_text.clone(),
                    chars: view.resume_chars,
                    loading: view.loading,
                }
                InputPanel {
                    id: "jd",
                    name: "jdText",
                    label: "Job Description",
                    placeholder: "Paste the job description here...",
                    value: view.jd_text.clone(),
                    chars: view.jd_chars,
                    loading: view.loading,
                }
            }
            if let Some(message) = view.error.clone() {
                div {
                    class: "error bg-red-50 border-l-4 border-red-500 text-red-700 p-5 rounded-2xl",
                    role: "alert",
                    p { class: "font-semibold", "{message}" }
                }
            }
            div {
                class: "flex flex-col sm:flex-row gap-4 justify-center pt-4",
                button {
                    id: "analyze",
                    r#type: "submit",
                    class: "px-10 py-4 bg-purple-600 text-white font-bold rounded-2xl",
                    disabled: view.loading,
                    if view.loading { "Analyzing Your Match..." } else { "Analyze Match" }
                }
                // Stays enabled while loading: reset supersedes the request in flight.
                button {
                    id: "reset",
                    r#type: "submit",
                    formaction: "/reset",
                    class: "px-10 py-4 bg-gray-600 text-white font-bold rounded-2xl",
                    "Start Over"
                }
            }
        }
    }
}

#[component]
fn InputPanel(
    id: &'static str,
    name: &'static str,
    label: &'static str,
    placeholder: &'static str,
    value: String,
    chars: usize,
    loading: bool,
) -> Element {
    rsx! {
        div {
            class: "space-y-3",
            label { r#for: id, class: "text-lg font-bold text-gray-800", "{label}" }
            div {
                class: "relative",
                textarea {
                    id,
                    name,
                    rows: "12",
                    placeholder,
                    class: "w-full px-6 py-4 border-2 border-gray-200 rounded-2xl",
                    disabled: loading,
                    "{value}"
                }
                div { class: "char-count absolute bottom-4 right-4 text-xs text-gray-400", "{chars} characters" }
            }
        }
    }
}

#[component]
fn ResultSection(result: ResultView) -> Element {
    let style = result.style;
    rsx! {
        section {
            id: "result",
            class: "mt-16 space-y-10",
            div {
                class: "flex justify-center",
                div {
                    class: "score relative w-56 h-56 rounded-full border-8 {style.ring_class} {style.background_class} flex flex-col items-center justify-center",
                    "data-tier": result.tier.as_str(),
                    div { class: "absolute inset-0 bg-gradient-to-r {style.glow_class} rounded-full blur-2xl opacity-30" }
                    span { class: "score-value text-6xl font-black {style.ring_class}", "{result.score_text}" }
                    span { class: "score-label text-base font-bold text-gray-700 mt-3", "{style.label}" }
                }
            }
            div {
                class: "grid md:grid-cols-2 gap-8",
                div {
                    class: "matched-skills bg-emerald-50 rounded-3xl p-8",
                    h3 { class: "text-2xl font-black text-gray-800 mb-6", "Matched Skills" }
                    SkillBadges {
                        skills: result.matched_skills.clone(),
                        colour: "text-emerald-800 border-emerald-300",
                        empty_text: NO_MATCHED_SKILLS,
                        empty_class: "placeholder text-gray-500 italic",
                    }
                }
                div {
                    class: "missing-skills bg-rose-50 rounded-3xl p-8",
                    h3 { class: "text-2xl font-black text-gray-800 mb-6", "Missing Skills" }
                    SkillBadges {
                        skills: result.missing_skills.clone(),
                        colour: "text-rose-800 border-rose-300",
                        empty_text: ALL_SKILLS_PRESENT,
                        empty_class: "placeholder text-emerald-600 font-bold",
                    }
                }
            }
            div {
                class: "feedback bg-purple-600 rounded-3xl p-10 text-white",
                h3 { class: "text-3xl font-black mb-6", "AI Insights & Recommendations" }
                p { class: "text-lg leading-relaxed", "{result.feedback}" }
            }
        }
    }
}

#[component]
fn SkillBadges(
    skills: Vec<String>,
    colour: &'static str,
    empty_text: &'static str,
    empty_class: &'static str,
) -> Element {
    if skills.is_empty() {
        return rsx! {
            p { class: empty_class, "{empty_text}" }
        };
    }
    rsx! {
        div {
            class: "flex flex-wrap gap-3",
            for skill in skills.iter() {
                span {
                    class: "badge px-5 py-2.5 bg-white rounded-full text-sm font-bold border-2 {colour}",
                    "{skill}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MatchError;
    use crate::form::state::tests::sample_result;
    use crate::form::state::MatchForm;
    use crate::form::tier::StyleVariant;
    use crate::models::matching::MatchResult;

    fn page_for(outcome: Result<MatchResult, MatchError>) -> String {
        let mut form = MatchForm::new();
        let (ticket, _) = form.begin_submit("resume", "jd").unwrap();
        form.complete(ticket, outcome);
        render_page(&FormView::from_form(&form, StyleVariant::Vivid))
    }

    /// The opening tag and content of the first `<button` whose text contains `text`.
    fn button_containing<'a>(page: &'a str, text: &str) -> &'a str {
        let at = page.find(text).expect("button text");
        let start = page[..at].rfind("<button").expect("button tag");
        &page[start..at]
    }

    #[test]
    fn test_success_page_shows_score_badges_and_feedback() {
        let page = page_for(Ok(sample_result(85.0)));
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("85%"));
        assert!(page.contains("Excellent Match"));
        assert!(page.contains(r#"data-tier="success""#));
        assert_eq!(page.matches(r#"class="badge"#).count(), 2);
        assert!(page.contains("Python"));
        assert!(page.contains("Go"));
        assert!(page.contains("Great fit"));
        assert!(!page.contains(NO_MATCHED_SKILLS));
        assert!(!page.contains(ALL_SKILLS_PRESENT));
    }

    #[test]
    fn test_request_failure_shows_message_without_result() {
        let page = page_for(Err(MatchError::Request { status: 500 }));
        assert!(page.contains("Failed to get match results"));
        assert!(!page.contains(r#"id="result""#));
    }

    #[test]
    fn test_empty_skill_lists_show_placeholders() {
        let page = page_for(Ok(MatchResult {
            match_score: 30.0,
            matched_skills: vec![],
            missing_skills: vec![],
            feedback: "Low match.".to_string(),
        }));
        assert!(page.contains(NO_MATCHED_SKILLS));
        assert!(page.contains(ALL_SKILLS_PRESENT));
        assert!(page.contains("Needs Work"));
        assert!(!page.contains(r#"class="badge"#));
    }

    #[test]
    fn test_loading_disables_inputs_but_not_start_over() {
        let mut form = MatchForm::new();
        let _ = form.begin_submit("resume", "jd");
        let page = render_page(&FormView::from_form(&form, StyleVariant::Vivid));

        assert!(page.contains("Analyzing Your Match..."));
        assert!(button_containing(&page, "Analyzing Your Match...").contains("disabled"));
        assert!(!button_containing(&page, "Start Over").contains("disabled"));
    }

    #[test]
    fn test_upstream_text_is_escaped() {
        let page = page_for(Ok(MatchResult {
            match_score: 50.0,
            matched_skills: vec!["<img src=x onerror=alert(1)>".to_string()],
            missing_skills: vec![],
            feedback: "<b>bold</b> & more".to_string(),
        }));
        assert!(!page.contains("<img src=x"));
        assert!(!page.contains("<b>bold</b>"));
        assert!(page.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_entered_text_is_escaped_and_counted() {
        let mut form = MatchForm::new();
        let _ = form.begin_submit("<script>", " ");
        let page = render_page(&FormView::from_form(&form, StyleVariant::Vivid));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script></textarea>"));
        assert!(page.contains("8 characters"));
        assert!(page.contains("Please fill in both resume and job description fields"));
    }
}
