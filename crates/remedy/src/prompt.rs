//! Remediation prompt rendering.
//!
//! One inline Handlebars template; the rendered markdown is handed to the
//! fix agent as its working brief.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::RemedyError;

const FIX_PROMPT_TEMPLATE: &str = r#"# Deployment Failure Remediation

{{#if deployment_id}}Railway deployment `{{deployment_id}}` has failed.{{else}}A Railway deployment has failed.{{/if}}
{{#if repository}}Repository: {{repository}}{{/if}}

## Extracted errors

{{#each errors}}
- {{{this}}}
{{/each}}
{{#unless errors}}
No individual error lines could be extracted; work from the raw log excerpt below.
{{/unless}}

## Log excerpt

```
{{{log_excerpt}}}
```

## Task

Diagnose the failure from the logs above, fix the root cause in this
repository, and verify that the project builds before finishing.
"#;

/// Context for rendering the fix prompt
#[derive(Debug, Serialize)]
pub struct FixContext {
    /// Deployment id, empty when triggered from raw logs only
    pub deployment_id: String,
    /// Repository slug, empty when not configured
    pub repository: String,
    /// Extracted error lines
    pub errors: Vec<String>,
    /// Tail of the raw log stream
    pub log_excerpt: String,
}

/// Render the remediation prompt for the given context.
pub fn render_fix_prompt(context: &FixContext) -> Result<String, RemedyError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);
    handlebars
        .render_template(FIX_PROMPT_TEMPLATE, context)
        .map_err(Into::into)
}
