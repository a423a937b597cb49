// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Canvasmaid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Canvasmaid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

fn view_title(label: &str, key: char, tail: Option<&str>) -> String {
    let mut title = format!("─[{key}]─ {label}");
    if let Some(tail) = tail {
        let tail = tail.trim();
        if !tail.is_empty() {
            title.push(' ');
            title.push_str(tail);
        }
    }
    title.push(' ');
    title
}

fn file_line(view: &ViewSnapshot, loading: bool) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();
    match view.file_name.as_deref() {
        Some(file_name) => spans.push(Span::styled(
            file_name.to_owned(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled(
            "No file, press o to open a .canvas file".to_owned(),
            Style::default().fg(Color::DarkGray),
        )),
    }
    if loading {
        spans.push(Span::styled("  loading…".to_owned(), Style::default().fg(FOOTER_KEY_COLOR)));
    }
    if let Some(error) = view.last_error.as_deref() {
        spans.push(Span::styled(format!("  {error}"), Style::default().fg(ERROR_COLOR)));
    }
    Line::from(spans)
}

fn swatch_color(color: &HexColor) -> Color {
    let (r, g, b) = color.rgb();
    Color::Rgb(r, g, b)
}

fn palette_lines(palette: &ColorPalette, selected: ColorGroupId, editing: bool) -> Vec<Line<'static>> {
    ColorGroupId::all()
        .map(|group| {
            let is_selected = group == selected;
            let display = palette.display_color(group);
            let draft = palette.draft(group);
            // An invalid draft still previews the committed swatch.
            let preview = HexColor::parse(display).unwrap_or_else(|_| palette.committed(group).clone());

            let marker = match (is_selected, editing) {
                (true, true) => "✎ ",
                (true, false) => "▶ ",
                (false, _) => "  ",
            };
            let mut label_style = Style::default();
            if is_selected {
                label_style = label_style.fg(FOCUS_COLOR).add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![
                Span::styled(marker.to_owned(), label_style),
                Span::styled(format!("{group} "), label_style),
                Span::styled("██".to_owned(), Style::default().fg(swatch_color(&preview))),
                Span::raw(" "),
                Span::styled(display.to_owned(), label_style),
            ];
            match draft {
                Some(draft) if HexColor::parse(draft).is_err() => {
                    spans.push(Span::styled(" invalid".to_owned(), Style::default().fg(ERROR_COLOR)));
                }
                Some(draft) if draft != palette.committed(group).as_str() => {
                    spans.push(Span::styled(" *".to_owned(), Style::default().fg(STALE_COLOR)));
                }
                _ => {}
            }
            Line::from(spans)
        })
        .collect()
}

fn output_text(view: &ViewSnapshot) -> Text<'static> {
    let mut lines = Vec::<Line<'static>>::new();
    match view.state {
        GenerationState::Empty => {
            lines.push(Line::from(Span::styled(
                "Open a JSON Canvas file to generate a Mermaid flowchart.".to_owned(),
                Style::default().fg(Color::DarkGray),
            )));
            return Text::from(lines);
        }
        GenerationState::Stale => {
            lines.push(Line::from(Span::styled(
                "Palette changed. Press r to regenerate.".to_owned(),
                Style::default().fg(STALE_COLOR).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
        }
        GenerationState::Generated => {}
    }

    let diagram_style = match view.state {
        GenerationState::Stale => Style::default().fg(Color::DarkGray),
        GenerationState::Empty | GenerationState::Generated => Style::default(),
    };
    if let Some(diagram) = view.diagram.as_deref() {
        lines.extend(diagram.lines().map(|line| Line::from(Span::styled(line.to_owned(), diagram_style))));
    }
    Text::from(lines)
}

fn output_border_style(state: GenerationState) -> Style {
    match state {
        GenerationState::Stale => Style::default().fg(STALE_COLOR),
        GenerationState::Generated => Style::default().fg(FOCUS_COLOR),
        GenerationState::Empty => Style::default(),
    }
}

fn footer_help_line<C>(app: &App<C>, toast_suffix: &str, copied: bool) -> Line<'static> {
    let mut spans = Vec::<Span<'static>>::new();

    match app.input {
        InputMode::OpenPath { .. } => {
            push_footer_entry(&mut spans, "LOAD", "⏎");
            push_footer_entry(&mut spans, "CANCEL", "esc");
        }
        InputMode::EditColor => {
            push_footer_entry(&mut spans, "HEX", "#0-9a-f");
            push_footer_entry(&mut spans, "SHADE", "+/-");
            push_footer_entry(&mut spans, "COMMIT", "⏎");
            push_footer_entry(&mut spans, "CANCEL", "esc");
        }
        InputMode::Normal => {
            push_footer_entry(&mut spans, "OPEN", "o");
            push_footer_entry(&mut spans, "GROUP", "1-6");
            push_footer_entry(&mut spans, "EDIT", "e");
            push_footer_entry(&mut spans, "REGEN", "r");
            push_footer_entry(&mut spans, "COPY", "c");
            push_footer_entry(&mut spans, "LINK", "l");
            push_footer_entry(&mut spans, "REMOVE", "x");
            push_footer_entry(&mut spans, "HELP", "?");
            push_footer_entry(&mut spans, "QUIT", "q");
        }
    }

    if copied {
        spans.push(Span::styled(
            " | Copied!".to_owned(),
            Style::default().fg(FOCUS_COLOR).add_modifier(Modifier::BOLD),
        ));
    }
    if !toast_suffix.is_empty() {
        spans.push(Span::styled(toast_suffix.to_owned(), Style::default().fg(Color::White)));
    }
    Line::from(spans)
}

fn footer_brand_line() -> Line<'static> {
    Line::from(vec![Span::styled(
        FOOTER_BRAND.to_owned(),
        Style::default().fg(FOOTER_BRAND_COLOR),
    )])
}

fn help_key_style() -> Style {
    Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD)
}

fn help_header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = (100u16.saturating_sub(height_percent)) / 2;
    let horizontal_margin = (100u16.saturating_sub(width_percent)) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}

fn help_kv(key: &str, desc: &str, key_width: usize, key_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{key:>width$}", width = key_width), key_style),
        Span::raw("  "),
        Span::raw(desc.to_owned()),
    ])
}

const HELP_ENTRIES: &[(&str, &[(&str, &str)])] = &[
    (
        "File",
        &[
            ("o", "open a .canvas file by path"),
            ("x", "remove the loaded file"),
        ],
    ),
    (
        "Palette",
        &[
            ("1-6, j/k", "select color group"),
            ("e/Enter", "edit the selected group"),
            ("#0-9a-f", "type hex while editing (live preview)"),
            ("+/-", "lighten/darken the selected group"),
            ("Enter", "commit the edit"),
            ("Esc", "cancel the edit and revert"),
        ],
    ),
    (
        "Diagram",
        &[
            ("r", "regenerate with the committed palette"),
            ("c/y", "copy Mermaid to the clipboard"),
            ("l", "copy a Mermaid Live Editor link"),
            ("PgUp/PgDn/Home", "scroll output"),
        ],
    ),
    ("Global", &[("?", "toggle help"), ("q, Ctrl-C", "quit")]),
];

fn render_help(frame: &mut Frame<'_>, main_area: Rect) {
    let area = centered_rect(70, 80, main_area);
    frame.render_widget(Clear, area);

    let key_style = help_key_style();
    let header_style = help_header_style();
    let key_col_width = HELP_ENTRIES
        .iter()
        .flat_map(|(_, entries)| entries.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::<Line<'static>>::new();
    for (idx, (section, entries)) in HELP_ENTRIES.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(format!("--- {section} ---"), header_style)));
        for (key, desc) in entries.iter() {
            lines.push(help_kv(key, desc, key_col_width, key_style));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(view_title("Help", '?', None)))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, value: &str) {
    if !spans.is_empty() {
        spans.push(Span::styled(" | ".to_owned(), Style::default().fg(FOOTER_LABEL_COLOR)));
    }
    spans.push(Span::styled(
        format!("{}:", footer_label_ucfirst(label)),
        Style::default().fg(FOOTER_LABEL_COLOR),
    ));
    spans.push(Span::styled(
        value.to_owned(),
        Style::default().fg(FOOTER_KEY_COLOR).add_modifier(Modifier::BOLD),
    ));
}

fn footer_label_ucfirst(label: &str) -> String {
    let lower = label.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}
