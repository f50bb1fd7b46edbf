//! Built-in agent instruction templates

use serde::Serialize;

pub const DRAFT_AGENT: &str = "draft_agent";
pub const SUBJECT_WRITER: &str = "subject_writer";
pub const HTML_CONVERTER: &str = "html_converter";
pub const SALES_MANAGER: &str = "sales_manager";

const DRAFT_AGENT_TEMPLATE: &str = "\
You are a sales agent working for {{company}}, a company that provides {{pitch}}.
{{directive}}
Write only the body of the email, greeting and sign-off included, following the brief you are given. \
Do not write a subject line.";

const SUBJECT_WRITER_TEMPLATE: &str = "\
You can write a subject for a cold sales email. You are given a message and you need to write a subject \
for an email that is highly likely to get a response.
Reply with the subject line only.";

const HTML_CONVERTER_TEMPLATE: &str = "\
You can convert a text email body into an HTML email body. You are given a text email body which might \
have some markdown and you need to convert it into an HTML email body with simple, clear, compelling \
layout and design.
Keep the wording and meaning of the original. Reply with the HTML only.";

const SALES_MANAGER_TEMPLATE: &str = "\
You are a sales manager working for {{company}}. Several sales agents have written cold sales emails \
for the same recipient. Compare them and pick the single best email using your judgment: the one most \
likely to get a response from this recipient.
Answer on the first line with exactly `SELECT: <number>` and on the second line with one sentence \
explaining your choice.";

/// Name/template pairs registered by `PromptRenderer::with_builtin_templates`
pub const BUILTIN: [(&str, &str); 4] = [
    (DRAFT_AGENT, DRAFT_AGENT_TEMPLATE),
    (SUBJECT_WRITER, SUBJECT_WRITER_TEMPLATE),
    (HTML_CONVERTER, HTML_CONVERTER_TEMPLATE),
    (SALES_MANAGER, SALES_MANAGER_TEMPLATE),
];

/// Template context shared by all agents
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext<'a> {
    pub company: &'a str,
    pub pitch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<&'a str>,
}
