// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML transcript documents.
//!
//! A day's HTML log is always a complete document on disk once closed:
//! the prologue (head, heading, nick legend, table open) is written by
//! [`HtmlDocument::open`], rows are appended live, and the footer is
//! written exactly once by [`HtmlDocument::close`]. `close` consumes the
//! document, so nothing can be written after the footer.

use std::borrow::Cow;
use std::io;

use chrono::NaiveDate;
use lp_core::{day_stamp, Badge, Message, TimeFormat};

use crate::sink::SyncWrite;

/// Prefix of every row's `id` attribute; the per-day sequence id follows.
pub const ROW_ID_PREFIX: &str = "msg-";

/// Default extra `<head>` markup: the stylesheet for nick badges and cells.
pub const DEFAULT_EXTRA_HEAD: &str = r#"    <style type="text/css">
    body {
       background-color: white;
    }
    .chattable {
        border-collapse: collapse;
    }
    .msgnick {
        border-right: 1px solid black;
        padding-right: 8px;
        padding-left: 4px;
    }
    .opped {
        color: #006e21;
        font-weight: bold;
    }
    .halfopped {
        color: #006e21;
    }
    .voiced {
        color: #00a5ff;
        font-style: italic;
    }
    .msgmessage {
        padding-left: 8px;
    }
    </style>
"#;

const FOOTER: &str = "    </table>\n  </body>\n</html>\n";

/// How caller-supplied text (room, nick, message) is embedded in markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Markup {
    /// Escape `& < > " '` so any message keeps the document well-formed
    #[default]
    Escape,
    /// Embed text byte-for-byte. A message containing markup can break
    /// the document or inject into the rendered log.
    Verbatim,
}

impl Markup {
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            Markup::Escape => escape(text),
            Markup::Verbatim => Cow::Borrowed(text),
        }
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Values rendered into the document prologue.
#[derive(Debug, Clone, Copy)]
pub struct HtmlHeader<'a> {
    pub room: &'a str,
    pub day: NaiveDate,
    /// Trusted markup inserted verbatim into `<head>`
    pub extra_head: &'a str,
}

/// An open HTML transcript document.
pub struct HtmlDocument<W: SyncWrite> {
    /// `None` only after `close`/`abandon` released the writer
    out: Option<W>,
    markup: Markup,
    last_row: u64,
}

impl<W: SyncWrite> HtmlDocument<W> {
    /// Write the document prologue and return the open document.
    pub fn open(mut out: W, header: &HtmlHeader<'_>, markup: Markup) -> io::Result<Self> {
        let prologue = render_prologue(header, markup);
        out.write_all(prologue.as_bytes())?;
        out.sync()?;
        Ok(Self {
            out: Some(out),
            markup,
            last_row: 0,
        })
    }

    /// Append one table row and sync it.
    ///
    /// `seq` must be strictly greater than every id already written to this
    /// document; row ids are unique only under that contract.
    pub fn append_row(
        &mut self,
        seq: u64,
        message: &Message,
        badge: Badge,
        time_format: &TimeFormat,
    ) -> io::Result<()> {
        if seq <= self.last_row {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "row id {seq} does not follow {} in this document",
                    self.last_row
                ),
            ));
        }
        let row = render_row(seq, message, badge, time_format, self.markup);
        let out = self.writer()?;
        out.write_all(row.as_bytes())?;
        out.sync()?;
        self.last_row = seq;
        Ok(())
    }

    /// Id of the last row written, 0 if none.
    pub fn last_row(&self) -> u64 {
        self.last_row
    }

    /// Write the footer and release the writer.
    pub fn close(mut self) -> io::Result<W> {
        let mut out = self.take_writer()?;
        out.write_all(FOOTER.as_bytes())?;
        out.sync()?;
        Ok(out)
    }

    /// Release the writer without a footer.
    ///
    /// Only for documents already broken by a failed write; the file is
    /// left as-is for an operator to inspect.
    pub fn abandon(mut self) -> Option<W> {
        self.out.take()
    }

    fn writer(&mut self) -> io::Result<&mut W> {
        self.out.as_mut().ok_or_else(released)
    }

    fn take_writer(&mut self) -> io::Result<W> {
        self.out.take().ok_or_else(released)
    }
}

impl<W: SyncWrite> Drop for HtmlDocument<W> {
    fn drop(&mut self) {
        if self.out.is_some() {
            tracing::error!(
                last_row = self.last_row,
                "html document dropped without its footer"
            );
        }
    }
}

fn released() -> io::Error {
    io::Error::other("html document writer already released")
}

fn render_prologue(header: &HtmlHeader<'_>, markup: Markup) -> String {
    let room = markup.apply(header.room);
    let day = day_stamp(header.day);

    let mut html = String::with_capacity(1024 + header.extra_head.len());
    html.push_str("<!DOCTYPE HTML>\n<html>\n  <head>\n");
    html.push_str(&format!("    <title>Chatlogs {room} {day}</title>\n"));
    html.push_str("    <meta charset=\"utf-8\"/>\n");
    html.push_str(header.extra_head);
    if !header.extra_head.is_empty() && !header.extra_head.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("  </head>\n  <body>\n");
    html.push_str(&format!("    <h1>Chatlogs for {room}, {day}</h1>\n"));
    html.push_str("    <p>Nick colors:</p>\n    <dl>\n");
    for (badge, description) in Badge::LEGEND {
        match badge.css_class() {
            "" => html.push_str(&format!("      <dt>Nick</dt><dd>{description}</dd>\n")),
            class => html.push_str(&format!(
                "      <dt class=\"{class}\">Nick</dt><dd>{description}</dd>\n"
            )),
        }
    }
    html.push_str("    </dl>\n    <hr/>\n    <table class=\"chattable\">\n");
    html
}

fn render_row(
    seq: u64,
    message: &Message,
    badge: Badge,
    time_format: &TimeFormat,
    markup: Markup,
) -> String {
    let nick_class = match badge.css_class() {
        "" => Cow::Borrowed("msgnick"),
        class => Cow::Owned(format!("msgnick {class}")),
    };
    format!(
        concat!(
            "      <tr id=\"{prefix}{seq}\">\n",
            "        <td class=\"msgtime\">{time}</td>\n",
            "        <td class=\"{nick_class}\">{nick}</td>\n",
            "        <td class=\"msgmessage\">{text}</td>\n",
            "      </tr>\n",
        ),
        prefix = ROW_ID_PREFIX,
        seq = seq,
        time = time_format.format(&message.timestamp),
        nick_class = nick_class,
        nick = markup.apply(&message.sender),
        text = markup.apply(&message.text),
    )
}

#[cfg(test)]
#[path = "html_tests.rs"]
mod tests;
