//! HTML form page
//!
//! The page posts to the JSON actions in `api` and drops the returned
//! `card_html` / message into the result panels.

use eta_core::models::{OrderType, VehicleType};

const STYLE: &str = r#"
body { font-family: Inter, Arial, sans-serif; background: #f1f5f9; margin: 0; }
#main { max-width: 760px; margin: 40px auto; background: white; padding: 32px; border-radius: 24px; box-shadow: 0 20px 50px rgba(15,23,42,0.08); }
h1 { margin: 0; font-size: 34px; }
.subtitle { color: #64748b; margin-bottom: 24px; }
label { display: block; font-size: 14px; color: #334155; margin-top: 14px; }
input, select { width: 100%; padding: 10px; border-radius: 10px; border: 1px solid #cbd5e1; box-sizing: border-box; }
.row { display: flex; gap: 16px; }
.row > div { flex: 1; }
.actions { display: flex; gap: 12px; margin-top: 22px; }
button { flex: 1; padding: 12px; border: 0; border-radius: 12px; font-weight: 700; cursor: pointer; color: white; background: #667eea; }
button.secondary { background: #334155; }
.panel { margin-top: 22px; }
.message { color: #334155; font-size: 14px; }
.error { color: #b91c1c; }
footer { text-align: center; color: #94a3b8; font-size: 14px; margin-top: 28px; }
"#;

const SCRIPT: &str = r#"
async function postJson(path, body) {
  const response = await fetch(path, {
    method: 'POST',
    headers: { 'content-type': 'application/json' },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  const text = await response.text();
  let data;
  try {
    data = JSON.parse(text);
  } catch (_) {
    data = { error: text || response.statusText };
  }
  return { ok: response.ok, data };
}

function showError(id, message) {
  const p = document.createElement('p');
  p.className = 'error';
  p.textContent = message;
  document.getElementById(id).replaceChildren(p);
}

function formValues() {
  return {
    email: document.getElementById('email').value || null,
    age: parseFloat(document.getElementById('age').value),
    rating: parseFloat(document.getElementById('rating').value),
    distance: parseFloat(document.getElementById('distance').value),
    order_type: document.getElementById('order_type').value,
    vehicle_type: document.getElementById('vehicle_type').value,
  };
}

let lastRecord = null;

async function predict() {
  const { ok, data } = await postJson('/api/predict', formValues());
  if (ok) {
    document.getElementById('prediction').innerHTML = data.card_html;
  } else {
    showError('prediction', data.error);
  }
}

async function analyze() {
  document.getElementById('analysis').innerHTML = '<p class="message">Analysing…</p>';
  const { ok, data } = await postJson('/api/analyze', { domain: 'delivery' });
  if (!ok) {
    showError('analysis', data.error);
    return;
  }
  lastRecord = data.record;
  document.getElementById('analysis').innerHTML = data.card_html;
}

async function sendEmail() {
  document.getElementById('email-status').textContent = 'Sending…';
  const { ok, data } = await postJson('/api/email', lastRecord === null ? undefined : lastRecord);
  document.getElementById('email-status').textContent = ok ? data.message : data.error;
}
"#;

fn options(labels: impl Iterator<Item = &'static str>, selected: &str) -> String {
    labels
        .map(|label| {
            let attr = if label == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, label, attr)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the index page
pub fn render_index() -> String {
    let order_options = options(
        OrderType::ALL.iter().map(|o| o.label()),
        OrderType::Meal.label(),
    );
    let vehicle_options = options(
        VehicleType::ALL.iter().map(|v| v.label()),
        VehicleType::Motorcycle.label(),
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Smart Delivery Time Predictor</title>
<style>{style}</style>
</head>
<body>
<div id="main">
  <h1>Smart Delivery ETA</h1>
  <div class="subtitle">AI-powered food delivery time prediction using Machine Learning</div>

  <h3>User Details</h3>
  <label for="email">Email Address</label>
  <input id="email" type="email" placeholder="you@example.com">

  <h3>Delivery Parameters</h3>
  <div class="row">
    <div>
      <label for="age">Delivery Partner Age</label>
      <input id="age" type="number" min="18" max="60" value="30">
    </div>
    <div>
      <label for="rating">Delivery Partner Rating</label>
      <input id="rating" type="number" min="1" max="5" step="0.1" value="4.5">
    </div>
  </div>
  <label for="distance">Distance (km)</label>
  <input id="distance" type="number" min="0" step="0.1" value="5.0">
  <div class="row">
    <div>
      <label for="order_type">Type of Order</label>
      <select id="order_type">
{order_options}
      </select>
    </div>
    <div>
      <label for="vehicle_type">Type of Vehicle</label>
      <select id="vehicle_type">
{vehicle_options}
      </select>
    </div>
  </div>

  <div class="actions">
    <button onclick="predict()">Predict Delivery Time</button>
    <button class="secondary" onclick="analyze()">AI Decision Analysis</button>
    <button class="secondary" onclick="sendEmail()">Send Email Report</button>
  </div>

  <div id="prediction" class="panel"></div>
  <div id="analysis" class="panel"></div>
  <p id="email-status" class="panel message"></p>

  <footer>Gradient Boosting model • ONNX inference • AI decision reports</footer>
</div>
<script>{script}</script>
</body>
</html>"#,
        style = STYLE,
        script = SCRIPT,
        order_options = order_options,
        vehicle_options = vehicle_options,
    )
}
