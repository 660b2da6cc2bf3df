use tera::{Context, Tera};

use vigil_facts::validate::ValidationReport;

const REPORT_TEMPLATE_NAME: &str = "validation_report";

pub const REPORT_TEMPLATE: &str = r#"Data quality: {{ status }}
Records: {{ total_items }}
Required fields: {{ required_fields.items_with_all_required }}/{{ total_items }} complete
Dates: {{ dates.items_with_dates }} valid, {{ dates.invalid_dates }} invalid{% if dates.date_range %} ({{ dates.date_range.earliest }} to {{ dates.date_range.latest }}, {{ dates.date_range.span_days }} days){% endif %}
Trend readiness: {% if trend_readiness.ready %}ready ({{ trend_readiness.sort_method }}){% else %}not ready{% endif %}, {{ trend_readiness.instruments_with_trends }}/{{ trend_readiness.total_instruments }} instruments
{% if instruments %}
Instruments:
{% for i in instruments %}  - {{ i.instrument }}: {{ i.total_assessments }} assessments, {{ i.unique_timepoints }} timepoints, scores {{ i.score_min }} to {{ i.score_max }}{% if not i.ready_for_trends %} (single timepoint){% endif %}
{% endfor %}{% endif %}{% if flags.critical_details %}
Critical flags:
{% for f in flags.critical_details %}  - {{ f.instrument }}{% if f.timepoint %} @ {{ f.timepoint }}{% endif %}: {{ f.flag }}
{% endfor %}{% endif %}{% if errors %}
Errors:
{% for e in errors %}  - {{ e }}
{% endfor %}{% endif %}{% if warnings %}
Warnings:
{% for w in warnings %}  - {{ w }}
{% endfor %}{% endif %}{% if recommendations %}
Recommendations:
{% for r in recommendations %}  - {{ r }}
{% endfor %}{% endif %}"#;

/// Render a data-quality report as plain text.
pub fn render_validation(report: &ValidationReport) -> eyre::Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
        .map_err(|e| eyre::eyre!("failed to parse report template: {e}"))?;

    let value = serde_json::to_value(report)?;
    let context = Context::from_value(value)
        .map_err(|e| eyre::eyre!("failed to build report context: {e}"))?;

    let rendered = tera
        .render(REPORT_TEMPLATE_NAME, &context)
        .map_err(|e| eyre::eyre!("failed to render report: {e}"))?;
    Ok(rendered)
}
