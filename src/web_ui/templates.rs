//! Template engine setup and HTML templates.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tera::{Context, Tera, Value};

use super::routes::utils::encode_component;

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("login.html", LOGIN_TEMPLATE),
        ("batches.html", BATCHES_TEMPLATE),
        ("batch.html", BATCH_TEMPLATE),
        ("analysis_form.html", ANALYSIS_FORM_TEMPLATE),
        ("spoilage.html", SPOILAGE_TEMPLATE),
        ("vehicles.html", VEHICLES_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ])
    .expect("Failed to load templates");
    tera.register_filter("segment", segment_filter);

    tera
});

/// Percent-encode a value as one URL path segment or query value.
///
/// Unlike `urlencode`, `/` is encoded too.
fn segment_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(Value::String(encode_component(&raw)))
}

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Embedded Templates
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Agri Inventory{% endblock %}</title>
    <style>
        :root {
            --bg: #f6f5f0;
            --bg-secondary: #ffffff;
            --foreground: #1c2417;
            --foreground-secondary: rgba(28, 36, 23, 0.7);
            --foreground-tertiary: rgba(28, 36, 23, 0.45);
            --border: #dedbd0;
            --border-subtle: #ebe9e1;
            --accent: #3f6d2a;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--foreground);
            line-height: 1.6;
        }

        a { color: var(--accent); text-decoration: none; }
        a:hover { opacity: 0.7; }

        /* Header */
        .header {
            border-bottom: 1px solid var(--border);
            background: var(--bg-secondary);
            padding: 16px 32px;
        }
        .header-content {
            max-width: 1100px;
            margin: 0 auto;
            display: flex;
            align-items: center;
            justify-content: space-between;
        }
        .logo { font-size: 18px; font-weight: 600; color: var(--foreground); }
        .nav { display: flex; gap: 24px; font-size: 14px; }
        .nav a { color: var(--foreground-secondary); }

        /* Layout */
        .container { max-width: 1100px; margin: 0 auto; padding: 40px 32px; }

        h1 { font-size: 28px; font-weight: 600; margin-bottom: 24px; }
        h2 {
            font-size: 13px;
            font-weight: 500;
            color: var(--foreground-secondary);
            text-transform: uppercase;
            letter-spacing: 0.05em;
            margin: 32px 0 12px;
        }

        /* Cards & tables */
        .card {
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 12px;
            overflow: hidden;
        }
        .card-body { padding: 24px; }
        table { width: 100%; border-collapse: collapse; font-size: 14px; }
        th, td { text-align: left; padding: 12px 16px; border-bottom: 1px solid var(--border-subtle); }
        th { color: var(--foreground-tertiary); font-weight: 500; font-size: 12px; text-transform: uppercase; }
        tr:last-child td { border-bottom: none; }

        .facts { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 16px; }
        .fact-label { color: var(--foreground-tertiary); font-size: 12px; text-transform: uppercase; }
        .fact-value { font-size: 16px; font-weight: 500; }

        /* Badges */
        .badge {
            font-size: 11px;
            font-weight: 500;
            padding: 3px 10px;
            border-radius: 100px;
            background: var(--border-subtle);
            color: var(--foreground-secondary);
        }
        .badge-warning { background: rgba(234, 179, 8, 0.18); color: #8a6a00; }

        /* Alerts */
        .alert { padding: 12px 16px; border-radius: 8px; margin-bottom: 24px; font-size: 14px; }
        .alert-success { background: rgba(34, 197, 94, 0.12); color: #166534; border: 1px solid rgba(34, 197, 94, 0.3); }
        .alert-error { background: rgba(239, 68, 68, 0.1); color: #991b1b; border: 1px solid rgba(239, 68, 68, 0.3); }

        /* Forms */
        .form-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 16px; }
        label { display: block; font-size: 13px; color: var(--foreground-secondary); margin-bottom: 4px; }
        input, select {
            width: 100%;
            padding: 9px 12px;
            border: 1px solid var(--border);
            border-radius: 8px;
            font-size: 14px;
            background: var(--bg);
        }
        .field-error { color: #991b1b; font-size: 12px; margin-top: 4px; min-height: 16px; }

        /* Buttons */
        .btn {
            display: inline-flex;
            align-items: center;
            padding: 9px 18px;
            border-radius: 100px;
            font-size: 14px;
            font-weight: 500;
            border: none;
            cursor: pointer;
        }
        .btn-primary { background: var(--accent); color: #fff; }
        .btn-secondary { background: transparent; border: 1px solid var(--border); color: var(--foreground); }
        .btn-danger { background: transparent; border: 1px solid rgba(239, 68, 68, 0.5); color: #991b1b; }

        .breadcrumb { display: flex; gap: 8px; margin-bottom: 16px; font-size: 14px; color: var(--foreground-tertiary); }
        .empty { text-align: center; padding: 48px 24px; color: var(--foreground-tertiary); }
        .text-secondary { color: var(--foreground-secondary); }
        .text-sm { font-size: 13px; }
        .mt-4 { margin-top: 16px; }
        .flex { display: flex; }
        .justify-between { justify-content: space-between; }
        .items-center { align-items: center; }
    </style>
</head>
<body>
    <header class="header">
        <div class="header-content">
            <a href="/batches" class="logo">Agri Inventory</a>
            {% if current_user %}
            <nav class="nav">
                <a href="/batches">Batches</a>
                <a href="/spoilage">Spoilage</a>
                <a href="/vehicles">Vehicles</a>
                <span class="text-secondary">{{ current_user.username }}</span>
                <a href="/logout">Log out</a>
            </nav>
            {% endif %}
        </div>
    </header>
    <main class="container">
        {% if flash %}
        <div class="alert alert-{{ flash.kind }}">{{ flash.message }}</div>
        {% endif %}
        {% block content %}{% endblock %}
    </main>
</body>
</html>"##;

const LOGIN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Log in - Agri Inventory{% endblock %}
{% block content %}
<div class="card" style="max-width: 380px; margin: 40px auto;">
    <div class="card-body">
        <h1>Log in</h1>
        {% if error %}<div class="alert alert-error">{{ error }}</div>{% endif %}
        {% if message %}<div class="alert alert-success">{{ message }}</div>{% endif %}
        <form method="post" action="/login">
            <label for="username">Username</label>
            <input id="username" name="username" required autofocus>
            <label for="password" class="mt-4">Password</label>
            <input id="password" name="password" type="password" required>
            <button class="btn btn-primary mt-4" type="submit">Log in</button>
        </form>
    </div>
</div>
{% endblock %}"##;

const BATCHES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Batches - Agri Inventory{% endblock %}
{% block content %}
<h1>Batches</h1>
<div class="card">
    {% if batches %}
    <table>
        <thead>
            <tr><th>Batch</th><th>Crop</th><th>Type</th><th>Quantity</th><th>Harvested</th><th>Analyses</th></tr>
        </thead>
        <tbody>
            {% for batch in batches %}
            <tr>
                <td><a href="/batches/{{ batch.batch_id | segment }}">{{ batch.batch_id }}</a></td>
                <td>{% if batch.crop_name %}{{ batch.crop_name }}{% else %}-{% endif %}</td>
                <td>{% if batch.crop_type %}{{ batch.crop_type }}{% else %}-{% endif %}</td>
                <td>{{ batch.quantity }} {{ batch.unit }}</td>
                <td>{{ batch.harvest_date }}</td>
                <td><span class="badge">{{ batch.analysis_count }}</span></td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    {% else %}
    <div class="empty">No batches recorded yet</div>
    {% endif %}
</div>
{% endblock %}"##;

const BATCH_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ batch.batch_id }} - Agri Inventory{% endblock %}
{% block content %}
<div class="breadcrumb">
    <a href="/batches">Batches</a>
    <span>/</span>
    <span>{{ batch.batch_id }}</span>
</div>

<div class="flex justify-between items-center">
    <h1>{{ batch.crop_name }} &middot; {{ batch.batch_id }}</h1>
    <a class="btn btn-primary" href="/analysis/new?batch_id={{ batch.batch_id | segment }}">Add nutritional analysis</a>
</div>

<div class="card">
    <div class="card-body facts">
        <div><div class="fact-label">Crop type</div><div class="fact-value">{{ batch.crop_type }}</div></div>
        <div><div class="fact-label">Variety</div><div class="fact-value">{{ batch.crop_variety }}</div></div>
        <div><div class="fact-label">Quantity</div><div class="fact-value">{{ batch.quantity }} {{ batch.unit }}</div></div>
        <div><div class="fact-label">Harvested</div><div class="fact-value">{{ batch.harvest_date }}</div></div>
        <div><div class="fact-label">Storage</div><div class="fact-value">{% if batch.storage_location %}{{ batch.storage_location }}{% else %}-{% endif %}</div></div>
    </div>
</div>

<h2>Nutritional analyses</h2>
<div class="card">
    {% if analyses %}
    <table>
        <thead>
            <tr><th>Analysis</th><th>Date</th><th>Calories</th><th>Protein (g)</th><th>Vitamins</th><th>Minerals</th></tr>
        </thead>
        <tbody>
            {% for a in analyses %}
            <tr>
                <td class="text-sm">{{ a.analysis_id }}</td>
                <td>{{ a.year }}-{% if a.month < 10 %}0{% endif %}{{ a.month }}-{% if a.day < 10 %}0{% endif %}{{ a.day }}</td>
                <td>{{ a.calories }}</td>
                <td>{{ a.protein }}</td>
                <td>{{ a.vitamins }}</td>
                <td>{{ a.minerals }}</td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    {% else %}
    <div class="empty">No analyses for this batch yet</div>
    {% endif %}
</div>

<h2>Spoilage inspections</h2>
<div class="card">
    {% if spoilage_records %}
    <table>
        <thead>
            <tr><th>Inspection</th><th>Date</th><th>Inspector</th><th>Spoiled</th><th>Cause</th></tr>
        </thead>
        <tbody>
            {% for s in spoilage_records %}
            <tr>
                <td class="text-sm">{{ s.SpoilageID }}</td>
                <td>{{ s.InspectionDate }}</td>
                <td>{{ s.InspectorName }}</td>
                <td>{{ s.SpoilageLevel }}%</td>
                <td>{% if s.Cause %}{{ s.Cause }}{% else %}-{% endif %}</td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    {% else %}
    <div class="empty">No spoilage inspections recorded</div>
    {% endif %}
</div>
{% endblock %}"##;

// The inline daysInMonth mirrors crate::dates::days_in_month.
const ANALYSIS_FORM_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Nutritional analysis - Agri Inventory{% endblock %}
{% block content %}
<div class="breadcrumb">
    <a href="/batches">Batches</a>
    <span>/</span>
    <a href="/batches/{{ batch.batch_id | segment }}">{{ batch.batch_id }}</a>
    <span>/</span>
    <span>New analysis</span>
</div>

<h1>Nutritional analysis</h1>

<div class="card">
    <div class="card-body facts">
        <div><div class="fact-label">Crop</div><div class="fact-value">{{ batch.crop_name }}</div></div>
        <div><div class="fact-label">Crop type</div><div class="fact-value">{{ batch.crop_type }}</div></div>
        <div><div class="fact-label">Variety</div><div class="fact-value">{{ batch.crop_variety }}</div></div>
    </div>
</div>

{% if error %}<div class="alert alert-error mt-4">{{ error }}</div>{% endif %}

<div class="card mt-4">
    <div class="card-body">
        <form id="analysis-form" method="post" action="/analysis/new?batch_id={{ batch.batch_id | segment }}">
            <div class="form-grid">
                <div>
                    <label for="calories">Calories (kcal / 100 g)</label>
                    <input id="calories" name="calories" type="number" step="0.01" min="0" required value="{{ form.calories }}">
                </div>
                <div>
                    <label for="protein">Protein (g / 100 g)</label>
                    <input id="protein" name="protein" type="number" step="0.01" min="0" required value="{{ form.protein }}">
                </div>
                <div>
                    <label for="vitamins">Vitamins</label>
                    <input id="vitamins" name="vitamins" placeholder="A,C" required value="{{ form.vitamins }}">
                </div>
                <div>
                    <label for="minerals">Minerals</label>
                    <input id="minerals" name="minerals" placeholder="Iron,Zinc" required value="{{ form.minerals }}">
                </div>
                <div>
                    <label for="day">Day</label>
                    <input id="day" name="day" type="number" min="1" max="31" required value="{{ form.day }}">
                    <div class="field-error" id="day-error"></div>
                </div>
                <div>
                    <label for="month">Month</label>
                    <input id="month" name="month" type="number" min="1" max="12" required value="{{ form.month }}">
                </div>
                <div>
                    <label for="year">Year</label>
                    <input id="year" name="year" type="number" min="1900" max="2100" required value="{{ form.year }}">
                </div>
            </div>
            <button class="btn btn-primary mt-4" type="submit">Save analysis</button>
            <a class="btn btn-secondary mt-4" href="/batches/{{ batch.batch_id | segment }}">Cancel</a>
        </form>
    </div>
</div>

<script>
function isLeapYear(year) {
    return (year % 4 === 0 && year % 100 !== 0) || year % 400 === 0;
}

function daysInMonth(month, year) {
    if ([1, 3, 5, 7, 8, 10, 12].indexOf(month) !== -1) return 31;
    if ([4, 6, 9, 11].indexOf(month) !== -1) return 30;
    if (month === 2) return isLeapYear(year) ? 29 : 28;
    return 0;
}

(function () {
    var form = document.getElementById('analysis-form');
    var day = document.getElementById('day');
    var month = document.getElementById('month');
    var year = document.getElementById('year');
    var dayError = document.getElementById('day-error');

    function checkDay() {
        var m = parseInt(month.value, 10);
        var y = parseInt(year.value, 10);
        var d = parseInt(day.value, 10);
        var max = daysInMonth(m, y);
        if (max > 0) day.max = max;
        if (!max || isNaN(d) || isNaN(y)) {
            dayError.textContent = '';
            return true;
        }
        if (d < 1 || d > max) {
            dayError.textContent = 'Day must be between 1 and ' + max + ' for the selected month';
            return false;
        }
        dayError.textContent = '';
        return true;
    }

    [day, month, year].forEach(function (input) {
        input.addEventListener('input', checkDay);
    });
    form.addEventListener('submit', function (event) {
        if (!checkDay()) event.preventDefault();
    });
})();
</script>
{% endblock %}"##;

const SPOILAGE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Spoilage - Agri Inventory{% endblock %}
{% block content %}
<h1>Spoilage inspections</h1>
<div class="card">
    {% if records %}
    <table>
        <thead>
            <tr><th>Inspection</th><th>Batch</th><th>Crop</th><th>Date</th><th>Spoiled</th><th></th></tr>
        </thead>
        <tbody>
            {% for s in records %}
            <tr>
                <td class="text-sm">{{ s.SpoilageID }}</td>
                <td><a href="/batches/{{ s.BatchID | segment }}">{{ s.BatchID }}</a></td>
                <td>{% if s.CropName %}{{ s.CropName }}{% else %}-{% endif %}</td>
                <td>{{ s.InspectionDate }}</td>
                <td>{% if s.SpoilageLevel >= 10 %}<span class="badge badge-warning">{{ s.SpoilageLevel }}%</span>{% else %}{{ s.SpoilageLevel }}%{% endif %}</td>
                <td><button class="btn btn-secondary" type="button" data-spoilage-id="{{ s.SpoilageID }}">Details</button></td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    {% else %}
    <div class="empty">No spoilage inspections recorded</div>
    {% endif %}
</div>

<div class="card mt-4" id="spoilage-panel" hidden>
    <div class="card-body">
        <div class="alert alert-error" id="spoilage-error" hidden></div>
        <div class="facts" id="spoilage-facts"></div>
    </div>
</div>

<script>
(function () {
    var panel = document.getElementById('spoilage-panel');
    var facts = document.getElementById('spoilage-facts');
    var errorBox = document.getElementById('spoilage-error');
    var labels = [
        ['SpoilageID', 'Inspection'], ['BatchID', 'Batch'], ['CropName', 'Crop'],
        ['CropType', 'Crop type'], ['CropVariety', 'Variety'], ['InspectorName', 'Inspector'],
        ['InspectionDate', 'Date'], ['SpoilageLevel', 'Spoiled (%)'], ['Cause', 'Cause'],
        ['ActionTaken', 'Action taken']
    ];

    function show(data) {
        panel.hidden = false;
        facts.textContent = '';
        if (data.error) {
            errorBox.hidden = false;
            errorBox.textContent = data.error;
            return;
        }
        errorBox.hidden = true;
        labels.forEach(function (pair) {
            var cell = document.createElement('div');
            var label = document.createElement('div');
            var value = document.createElement('div');
            label.className = 'fact-label';
            value.className = 'fact-value';
            label.textContent = pair[1];
            value.textContent = data[pair[0]] === null ? '-' : data[pair[0]];
            cell.appendChild(label);
            cell.appendChild(value);
            facts.appendChild(cell);
        });
    }

    document.querySelectorAll('[data-spoilage-id]').forEach(function (button) {
        button.addEventListener('click', function () {
            var id = button.getAttribute('data-spoilage-id');
            fetch('/spoilage/details?spoilage_id=' + encodeURIComponent(id))
                .then(function (response) { return response.json(); })
                .then(show)
                .catch(function () { show({ error: 'Could not load spoilage details' }); });
        });
    });
})();
</script>
{% endblock %}"##;

const VEHICLES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Vehicles - Agri Inventory{% endblock %}
{% block content %}
<h1>Transport vehicles</h1>

{% if message %}
<div class="alert alert-{{ message.kind }}">{{ message.message }}</div>
{% endif %}

<div class="card">
    <div class="card-body">
        <form method="post" action="/vehicles">
            <div class="form-grid">
                <div>
                    <label for="vehicle_type">Vehicle type</label>
                    <input id="vehicle_type" name="vehicle_type" required placeholder="Flatbed Truck" value="{{ form.vehicle_type }}">
                </div>
                <div>
                    <label for="license_plate_number">License plate</label>
                    <input id="license_plate_number" name="license_plate_number" required value="{{ form.license_plate_number }}">
                </div>
                <div>
                    <label for="capacity">Capacity (tonnes)</label>
                    <input id="capacity" name="capacity" type="number" step="0.01" min="0.01" required value="{{ form.capacity }}">
                </div>
            </div>
            <button class="btn btn-primary mt-4" type="submit">Add vehicle</button>
        </form>
    </div>
</div>

<h2>Fleet</h2>
<div class="card">
    {% if vehicles %}
    <table>
        <thead>
            <tr><th>Type</th><th>License plate</th><th>Capacity</th><th>Shipments</th><th></th></tr>
        </thead>
        <tbody>
            {% for v in vehicles %}
            <tr>
                <td>{{ v.vehicle_type }}</td>
                <td>{{ v.license_plate_number }}</td>
                <td>{{ v.capacity }} t</td>
                <td>{% if v.shipment_count > 0 %}<span class="badge badge-warning">{{ v.shipment_count }} assigned</span>{% else %}<span class="badge">idle</span>{% endif %}</td>
                <td><a class="btn btn-danger" href="/vehicles?delete={{ v.vehicle_id | segment }}" onclick="return confirm('Delete this vehicle?');">Delete</a></td>
            </tr>
            {% endfor %}
        </tbody>
    </table>
    {% else %}
    <div class="empty">No vehicles registered</div>
    {% endif %}
</div>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error - Agri Inventory{% endblock %}
{% block content %}
<div class="card">
    <div class="card-body" style="padding: 48px; text-align: center;">
        <h1 style="margin-bottom: 16px;">Something went wrong</h1>
        <p class="text-secondary">{{ message }}</p>
        <a href="/batches" class="btn btn-secondary mt-4">Back to batches</a>
    </div>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let names: Vec<&str> = TEMPLATES.get_template_names().collect();
        for name in [
            "login.html",
            "batches.html",
            "batch.html",
            "analysis_form.html",
            "spoilage.html",
            "vehicles.html",
            "error.html",
        ] {
            assert!(names.contains(&name), "missing template {}", name);
        }
    }

    #[test]
    fn test_output_is_escaped() {
        let mut context = Context::new();
        context.insert("message", "<script>alert(1)</script>");
        let html = render("error.html", &context).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_batch_links_encode_slashes() {
        let mut context = Context::new();
        context.insert(
            "batches",
            &vec![serde_json::json!({
                "batch_id": "lot 7/a",
                "quantity": 10.0,
                "unit": "kg",
                "harvest_date": "2024-06-01",
                "crop_name": "Wheat",
                "crop_type": "Cereal",
                "analysis_count": 0,
            })],
        );
        let html = render("batches.html", &context).unwrap();
        assert!(html.contains("/batches/lot%207%2Fa"), "{}", html);
        assert!(!html.contains("/batches/lot%207/a"));
    }
}
