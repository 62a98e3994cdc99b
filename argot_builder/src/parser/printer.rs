use terminal_size::{terminal_size, Width};

use crate::constant::DEFAULT_PLACEHOLDER;
use crate::model::{CommandInfo, FieldSpec, PositionalSpec};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const INDENT: &str = "    ";
const PADDING_WIDTH: usize = 2;
const DEFAULT_TOTAL_WIDTH: usize = 100;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_HELP_WIDTH: usize = 17;

/// Renders the help of one command.
pub(crate) struct Printer {
    total_width: usize,
}

struct Row {
    left: String,
    middle: String,
    right: String,
}

impl Printer {
    pub(crate) fn terminal() -> Self {
        let total_width = match terminal_size() {
            Some((Width(width), _)) => width as usize,
            None => DEFAULT_TOTAL_WIDTH,
        };

        Self::new(total_width)
    }

    pub(crate) fn new(total_width: usize) -> Self {
        Self { total_width }
    }

    pub(crate) fn render(&self, info: &CommandInfo<'_>) -> String {
        let mut out: Vec<String> = Vec::default();

        if let Some(text) = info.description.or(info.about) {
            out.push(text.to_string());
            out.push(String::default());
        }

        let fields: Vec<&FieldSpec> = info.fields.iter().filter(|field| !field.hidden).collect();
        let mut usage = format!("{INDENT}{}", info.full_name);

        if !fields.is_empty() {
            usage.push_str(" [OPTIONS]");
        }

        if let Some(positional) = info.positional {
            usage.push_str(&format!(" [{}]...", positional_placeholder(positional)));
        }

        if !info.subcommands.is_empty() {
            usage.push_str(" <COMMAND>");
        }

        out.push("USAGE:".to_string());
        out.push(usage);

        if !fields.is_empty() {
            let rows: Vec<Row> = fields
                .iter()
                .map(|field| Row {
                    left: flag_grammar(field),
                    middle: field.env.clone().unwrap_or_default(),
                    right: field_help(field),
                })
                .collect();
            out.push(String::default());
            out.push("OPTIONS:".to_string());
            self.render_rows(&rows, &mut out);
        }

        if let Some(positional) = info.positional {
            let rows = vec![Row {
                left: format!("[{}]...", positional_placeholder(positional)),
                middle: String::default(),
                right: positional.help.clone(),
            }];
            out.push(String::default());
            out.push("ARGUMENTS:".to_string());
            self.render_rows(&rows, &mut out);
        }

        if !info.subcommands.is_empty() {
            let rows: Vec<Row> = info
                .subcommands
                .iter()
                .map(|subcommand| Row {
                    left: match subcommand.alias {
                        Some(alias) => format!("{}, {alias}", subcommand.name),
                        None => subcommand.name.to_string(),
                    },
                    middle: String::default(),
                    right: subcommand.about.unwrap_or_default().to_string(),
                })
                .collect();
            out.push(String::default());
            out.push("COMMANDS:".to_string());
            self.render_rows(&rows, &mut out);
        }

        out.join("\n")
    }

    fn render_rows(&self, rows: &[Row], out: &mut Vec<String>) {
        let left_width = rows
            .iter()
            .map(|row| row.left.chars().count())
            .max()
            .unwrap_or_default();
        let middle_width = rows
            .iter()
            .map(|row| row.middle.chars().count())
            .max()
            .unwrap_or_default();
        let mut prefix_width = INDENT.len() + left_width + PADDING_WIDTH;

        if middle_width > 0 {
            prefix_width += middle_width + PADDING_WIDTH;
        }

        let right_width = std::cmp::max(
            self.total_width.saturating_sub(prefix_width),
            MINIMUM_HELP_WIDTH,
        );

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Rendering rows with prefix {prefix_width} and help width {right_width}.");
        }

        for row in rows {
            let mut line = format!("{INDENT}{:left_width$}", row.left);

            if middle_width > 0 {
                line.push_str(&format!("{:PADDING_WIDTH$}{:middle_width$}", "", row.middle));
            }

            let parts = chunk(&row.right, right_width);

            match parts.split_first() {
                None => out.push(line.trim_end().to_string()),
                Some((first, rest)) => {
                    out.push(format!("{line}{:PADDING_WIDTH$}{first}", ""));

                    for part in rest {
                        out.push(format!("{:prefix_width$}{part}", ""));
                    }
                }
            }
        }
    }
}

fn flag_grammar(field: &FieldSpec) -> String {
    let mut grammar = match field.short {
        Some(short) => format!("-{short}, --{}", field.name),
        None => format!("--{}", field.name),
    };

    if field.has_arg() {
        let placeholder = if field.placeholder.is_empty() {
            DEFAULT_PLACEHOLDER
        } else {
            field.placeholder.as_str()
        };
        grammar.push_str(&format!(" <{placeholder}>"));
    }

    grammar
}

fn field_help(field: &FieldSpec) -> String {
    let suffix = if !field.has_arg() {
        None
    } else if field.required {
        Some("(required)".to_string())
    } else if !field.default.is_empty() {
        Some(format!("(default: {})", field.default))
    } else {
        None
    };

    match suffix {
        Some(suffix) if field.help.is_empty() => suffix,
        Some(suffix) => format!("{} {suffix}", field.help),
        None => field.help.clone(),
    }
}

fn positional_placeholder(positional: &PositionalSpec) -> String {
    if positional.placeholder.is_empty() {
        positional.name.to_ascii_uppercase().replace('-', "_")
    } else {
        positional.placeholder.clone()
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Words longer than the width are split across lines, with a trailing hyphen.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while characters.len() - left > width {
        let part: String = characters[left..left + increment].iter().collect();
        lines.push(format!("{part}-"));
        left += increment;
    }

    current.extend(&characters[left..]);
}
