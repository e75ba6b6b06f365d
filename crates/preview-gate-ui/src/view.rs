//! Declarative view tree produced by [`crate::FileUploadPreview::render`].

use std::fmt;

use preview_gate_core::{MediaKind, PreviewRepresentation};
use serde::Serialize;

use crate::{ComponentState, LoginForm, UploadWidget, WidgetPhase};

/// Text shown for media types without a typed preview.
pub const FALLBACK_PREVIEW_TEXT: &str = "No preview available";

/// Notice shown while an upload is in flight.
pub const UPLOADING_NOTICE_TEXT: &str = "Uploading and processing file...";

const MASK_CHAR: char = '*';

/// User action bound to a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Submit the credential form.
    SubmitLogin,
    /// Run the upload-then-process sequence.
    UploadAndProcess,
}

/// One rendered element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Node {
    /// Section heading.
    Heading {
        /// Heading level (2 for panels, 3 for sections).
        level: u8,
        /// Heading text.
        text: String,
    },
    /// Form submitted through `action`.
    Form {
        /// Submit action.
        action: Action,
        /// Form controls.
        children: Vec<Node>,
    },
    /// Labelled text input. Masked inputs carry one mask char per typed char.
    TextField {
        /// Input id.
        id: String,
        /// Label text.
        label: String,
        /// Displayed value.
        value: String,
        /// Whether the value is masked.
        masked: bool,
    },
    /// File picker control.
    FileInput,
    /// Push button.
    Button {
        /// Button caption.
        label: String,
        /// Bound action.
        action: Action,
        /// Whether the button is disabled.
        disabled: bool,
    },
    /// Titled group of nodes.
    Section {
        /// Section heading text.
        heading: String,
        /// Section body.
        children: Vec<Node>,
    },
    /// Inline image.
    Image {
        /// Image source URI.
        src: String,
        /// Alternative text.
        alt: String,
    },
    /// Inline audio player with controls.
    AudioPlayer {
        /// Audio source URI.
        src: String,
    },
    /// Inline video player with controls.
    VideoPlayer {
        /// Video source URI.
        src: String,
    },
    /// Embedded document frame.
    EmbeddedFrame {
        /// Frame source URI.
        src: String,
        /// Frame title.
        title: String,
    },
    /// Plain paragraph.
    Paragraph {
        /// Paragraph text.
        text: String,
    },
    /// Status banner.
    Notice {
        /// Notice text.
        text: String,
    },
    /// Blocking modal alert.
    Alert {
        /// Alert text.
        message: String,
    },
}

/// Rendered component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    /// Top-level nodes in document order.
    pub nodes: Vec<Node>,
}

impl View {
    /// Depth-first iterator over every node.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack: Vec<&Node> = self.nodes.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            if let Node::Form { children, .. } | Node::Section { children, .. } = node {
                stack.extend(children.iter().rev());
            }
            Some(node)
        })
    }

    /// Returns the section titled `heading`.
    pub fn section(&self, heading: &str) -> Option<&[Node]> {
        self.walk().find_map(|node| match node {
            Node::Section {
                heading: candidate,
                children,
            } if candidate == heading => Some(children.as_slice()),
            _ => None,
        })
    }

    /// Returns the button bound to `action`.
    pub fn button(&self, action: Action) -> Option<&Node> {
        self.walk().find(
            |node| matches!(node, Node::Button { action: candidate, .. } if *candidate == action),
        )
    }
}

/// Renders the preview element for one media kind.
pub fn render_preview(kind: MediaKind, preview: &PreviewRepresentation) -> Node {
    let src = preview.as_str().to_string();
    match kind {
        MediaKind::Image => Node::Image {
            src,
            alt: "Preview".to_string(),
        },
        MediaKind::Audio => Node::AudioPlayer { src },
        MediaKind::Video => Node::VideoPlayer { src },
        MediaKind::Pdf => Node::EmbeddedFrame {
            src,
            title: "PDF Preview".to_string(),
        },
        MediaKind::Other => Node::Paragraph {
            text: FALLBACK_PREVIEW_TEXT.to_string(),
        },
    }
}

pub(crate) fn render(state: &ComponentState) -> View {
    let nodes = match state {
        ComponentState::LoggedOut(form) => render_login(form),
        ComponentState::LoggedIn(widget) => render_widget(widget),
    };
    View { nodes }
}

fn render_login(form: &LoginForm) -> Vec<Node> {
    let mut nodes = vec![
        Node::Heading {
            level: 2,
            text: "Login".to_string(),
        },
        Node::Form {
            action: Action::SubmitLogin,
            children: vec![
                Node::TextField {
                    id: "username".to_string(),
                    label: "Username".to_string(),
                    value: form.credentials.identifier.clone(),
                    masked: false,
                },
                Node::TextField {
                    id: "password".to_string(),
                    label: "Password".to_string(),
                    value: MASK_CHAR
                        .to_string()
                        .repeat(form.credentials.secret.chars().count()),
                    masked: true,
                },
                Node::Button {
                    label: "Login".to_string(),
                    action: Action::SubmitLogin,
                    disabled: false,
                },
            ],
        },
    ];

    if let Some(alert) = &form.alert {
        nodes.push(Node::Alert {
            message: alert.message.clone(),
        });
    }
    nodes
}

fn render_widget(widget: &UploadWidget) -> Vec<Node> {
    let mut nodes = vec![
        Node::Heading {
            level: 2,
            text: "File Upload and Preview".to_string(),
        },
        Node::FileInput,
    ];

    let current = match &widget.phase {
        WidgetPhase::Idle => None,
        WidgetPhase::Ready(current) | WidgetPhase::Uploading(current) => Some(current),
    };

    if let Some(current) = current
        && let Some(preview) = &current.preview
    {
        nodes.push(Node::Section {
            heading: "Preview:".to_string(),
            children: vec![render_preview(current.file.kind(), preview)],
        });
    }

    let uploading = matches!(widget.phase, WidgetPhase::Uploading(_));
    if uploading {
        nodes.push(Node::Notice {
            text: UPLOADING_NOTICE_TEXT.to_string(),
        });
    }

    if let Some(processed) = &widget.processed {
        nodes.push(Node::Section {
            heading: "Manipulated Image:".to_string(),
            children: vec![Node::Image {
                src: processed.as_str().to_string(),
                alt: "Manipulated".to_string(),
            }],
        });
    }

    nodes.push(Node::Button {
        label: "Upload and Process".to_string(),
        action: Action::UploadAndProcess,
        disabled: !matches!(widget.phase, WidgetPhase::Ready(_)),
    });
    nodes
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write_node(f, node, 0)?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        Node::Heading { level, text } => {
            writeln!(f, "{indent}{} {text}", "#".repeat(usize::from(*level)))
        }
        Node::Form { children, .. } => {
            writeln!(f, "{indent}[form]")?;
            for child in children {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }
        Node::TextField { label, value, .. } => writeln!(f, "{indent}{label}: [{value}]"),
        Node::FileInput => writeln!(f, "{indent}[choose file]"),
        Node::Button {
            label, disabled, ..
        } => {
            let state = if *disabled { " (disabled)" } else { "" };
            writeln!(f, "{indent}<{label}>{state}")
        }
        Node::Section { heading, children } => {
            writeln!(f, "{indent}{heading}")?;
            for child in children {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }
        Node::Image { src, alt } => writeln!(f, "{indent}[image {alt}] {}", abbreviate(src)),
        Node::AudioPlayer { src } => writeln!(f, "{indent}[audio] {}", abbreviate(src)),
        Node::VideoPlayer { src } => writeln!(f, "{indent}[video] {}", abbreviate(src)),
        Node::EmbeddedFrame { src, title } => {
            writeln!(f, "{indent}[frame {title}] {}", abbreviate(src))
        }
        Node::Paragraph { text } => writeln!(f, "{indent}{text}"),
        Node::Notice { text } => writeln!(f, "{indent}! {text}"),
        Node::Alert { message } => writeln!(f, "{indent}!! {message}"),
    }
}

// Data URIs can be megabytes long.
fn abbreviate(src: &str) -> String {
    const LIMIT: usize = 48;
    match src.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}... ({} chars)", &src[..cut], src.chars().count()),
        None => src.to_string(),
    }
}
