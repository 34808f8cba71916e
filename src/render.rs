//! Plain-text rendering of catalog views.
//!
//! Renderers write into any `fmt::Write` so the CLI can print the result and
//! tests can assert on a `String`.

use crate::catalog::{Catalog, Question, SearchResult};
use crate::gateway::QuestionDto;
use crate::view::ViewState;
use std::fmt;

const MAX_CODE_LINES: usize = 40;

/// Visible topics with their icon and subtopic count; the selected topic is
/// marked with `>`.
pub fn render_topics(
    catalog: &Catalog,
    view: &ViewState,
    writer: &mut impl fmt::Write,
) -> fmt::Result {
    let topics = view.visible_topics(catalog);
    if topics.is_empty() {
        return writeln!(writer, "no topics match {:?}", view.global_query);
    }
    for name in topics {
        let Some(entry) = catalog.topic(name) else {
            continue;
        };
        let marker = if view.selected_topic() == Some(name) { ">" } else { " " };
        writeln!(
            writer,
            "{marker} {} {name} ({} subtopics)",
            entry.icon,
            entry.subtopics.len()
        )?;
    }
    Ok(())
}

pub fn render_subtopics(
    catalog: &Catalog,
    view: &ViewState,
    writer: &mut impl fmt::Write,
) -> fmt::Result {
    let Some(topic) = view.selected_topic() else {
        return writeln!(writer, "no topic selected");
    };
    let subtopics = view.visible_subtopics(catalog);
    if subtopics.is_empty() {
        return writeln!(writer, "no subtopics in {topic} match {:?}", view.subtopic_query);
    }
    writeln!(writer, "{topic}")?;
    for name in subtopics {
        let count = catalog
            .subtopic(topic, name)
            .map_or(0, |sub| sub.questions.len());
        let marker = if view.selected_subtopic() == Some(name) { ">" } else { " " };
        writeln!(writer, "{marker} {name} ({count} questions)")?;
    }
    Ok(())
}

/// Visible questions of the selected subtopic, honoring the expansion flags.
pub fn render_questions(
    catalog: &Catalog,
    view: &ViewState,
    writer: &mut impl fmt::Write,
) -> fmt::Result {
    let (Some(topic), Some(subtopic)) = (view.selected_topic(), view.selected_subtopic()) else {
        return writeln!(writer, "no subtopic selected");
    };
    let questions = view.visible_questions(catalog);
    if questions.is_empty() {
        return writeln!(
            writer,
            "no questions in {topic} / {subtopic} match {:?}",
            view.question_query
        );
    }
    writeln!(writer, "{topic} / {subtopic}")?;
    for question in questions {
        render_question(question, view, writer)?;
    }
    Ok(())
}

fn render_question(
    question: &Question,
    view: &ViewState,
    writer: &mut impl fmt::Write,
) -> fmt::Result {
    writeln!(writer, "[{}] {}", question.key, question.question)?;
    if !view.is_question_expanded(question.key) {
        return Ok(());
    }
    write_block(writer, "quick answer", &question.quick_answer, usize::MAX)?;
    if view.is_detail_expanded(question.key) {
        write_block(writer, "details", &question.detailed_answer, usize::MAX)?;
    }
    if view.is_code_expanded(question.key) {
        write_block(writer, "code", &question.code_example, MAX_CODE_LINES)?;
    }
    writeln!(writer)
}

/// Numbered search hits, one label per line.
pub fn render_search(results: &[SearchResult], writer: &mut impl fmt::Write) -> fmt::Result {
    if results.is_empty() {
        return writeln!(writer, "no results");
    }
    for (idx, result) in results.iter().enumerate() {
        writeln!(writer, "{:>2}. {}", idx + 1, result.label)?;
    }
    Ok(())
}

/// Backend search hits, each with the topic and subtopic it lives in.
pub fn render_remote_hits(hits: &[QuestionDto], writer: &mut impl fmt::Write) -> fmt::Result {
    if hits.is_empty() {
        return writeln!(writer, "no results");
    }
    for hit in hits {
        write!(writer, "[{}] {}", hit.id, hit.question)?;
        match (hit.topic_name.as_deref(), hit.subtopic_name.as_deref()) {
            (Some(topic), Some(subtopic)) => writeln!(writer, " ({topic} / {subtopic})")?,
            (Some(place), None) | (None, Some(place)) => writeln!(writer, " ({place})")?,
            (None, None) => writeln!(writer)?,
        }
    }
    Ok(())
}

fn write_block(
    writer: &mut impl fmt::Write,
    label: &str,
    text: &str,
    max_lines: usize,
) -> fmt::Result {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return writeln!(writer, "  {label}: (none)");
    }
    writeln!(writer, "  {label}:")?;
    let mut lines = trimmed.lines();
    for line in lines.by_ref().take(max_lines) {
        writeln!(writer, "    {}", line.trim_end())?;
    }
    if lines.next().is_some() {
        writeln!(writer, "    …")?;
    }
    Ok(())
}
