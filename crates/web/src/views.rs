//! HTML rendering.
//!
//! Pages are plain strings wrapped in [`Html`]. Every value that comes from
//! the API or the user goes through [`escape`] first.

use aggregator::{CalendarEvent, CategorySums, FlatCategory, Money, Totals, format_amount};
use api_types::{
    CategoryType,
    category::Category,
    transaction::{Transaction, TransactionType},
    wallet::Wallet,
};
use axum::response::Html;
use serde::Serialize;

use crate::session::Flash;

const CHART_JS: &str = "https://cdn.jsdelivr.net/npm/chart.js@4.4.1/dist/chart.umd.min.js";
const FULLCALENDAR_JS: &str =
    "https://cdn.jsdelivr.net/npm/fullcalendar@6.1.10/index.global.min.js";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// JSON safe to embed inside a `<script>` element.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json.replace('<', "\\u003c"),
        Err(err) => {
            tracing::error!("failed to encode chart data: {err}");
            "null".to_string()
        }
    }
}

fn flash_html(flash: Option<&Flash>) -> String {
    flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}" role="alert">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default()
}

fn layout(title: &str, username: Option<&str>, flash: Option<&Flash>, body: &str) -> Html<String> {
    let nav = match username {
        Some(name) => format!(
            r#"<nav class="navbar navbar-expand navbar-dark bg-dark mb-4">
  <div class="container">
    <a class="navbar-brand" href="/">Dompet</a>
    <ul class="navbar-nav me-auto">
      <li class="nav-item"><a class="nav-link" href="/transactions/new">New transaction</a></li>
      <li class="nav-item"><a class="nav-link" href="/calendar">Calendar</a></li>
      <li class="nav-item"><a class="nav-link" href="/statistics">Statistics</a></li>
    </ul>
    <span class="navbar-text me-3">{}</span>
    <a class="btn btn-outline-light btn-sm" href="/logout">Logout</a>
  </div>
</nav>"#,
            escape(name)
        ),
        None => String::new(),
    };

    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} · Dompet</title>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css">
</head>
<body class="bg-light">
{nav}
<main class="container">
{flash}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        flash = flash_html(flash),
    ))
}

pub fn login_page(flash: Option<&Flash>) -> Html<String> {
    let body = r#"<div class="row justify-content-center">
  <div class="col-md-4">
    <h1 class="h3 mb-3">Sign in</h1>
    <form method="post" action="/login">
      <div class="mb-3">
        <label class="form-label" for="username">Username</label>
        <input class="form-control" id="username" name="username" required autofocus>
      </div>
      <div class="mb-3">
        <label class="form-label" for="password">Password</label>
        <input class="form-control" id="password" name="password" type="password" required>
      </div>
      <button class="btn btn-primary w-100" type="submit">Login</button>
    </form>
  </div>
</div>"#;
    layout("Login", None, flash, body)
}

pub fn error_page(username: Option<&str>, status: u16, message: &str) -> Html<String> {
    let body = format!(
        r#"<div class="alert alert-danger">
  <h1 class="h4">Error {status}</h1>
  <p class="mb-0">{}</p>
</div>
<a href="/">Back to dashboard</a>"#,
        escape(message)
    );
    layout("Error", username, None, &body)
}

fn signed_amount(tx: &Transaction) -> String {
    let amount = format_amount(tx.amount);
    match tx.transaction_type {
        TransactionType::Income => format!(r#"<span class="text-success">+ {amount}</span>"#),
        TransactionType::Expense => format!(r#"<span class="text-danger">- {amount}</span>"#),
        TransactionType::Transfer => format!(r#"<span class="text-secondary">{amount}</span>"#),
    }
}

fn transaction_row(tx: &Transaction) -> String {
    let wallet = match &tx.target_wallet {
        Some(target) => format!(
            "{} → {}",
            escape(&tx.wallet.wallet_name),
            escape(&target.wallet_name)
        ),
        None => escape(&tx.wallet.wallet_name),
    };
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"text-end\">{}</td></tr>",
        escape(&tx.transaction_date.date().format("%Y-%m-%d").to_string()),
        escape(tx.description.as_deref().unwrap_or("-")),
        escape(tx.category_name().unwrap_or("-")),
        wallet,
        signed_amount(tx),
    )
}

pub struct DashboardView<'a> {
    pub username: &'a str,
    pub flash: Option<&'a Flash>,
    pub wallets: &'a [Wallet],
    pub total_balance: i64,
    pub transactions: &'a [&'a Transaction],
    pub query: &'a str,
    pub expenses: &'a CategorySums,
}

pub fn dashboard_page(view: &DashboardView<'_>) -> Html<String> {
    let wallets: String = if view.wallets.is_empty() {
        r#"<li class="list-group-item text-muted">No wallets yet.</li>"#.to_string()
    } else {
        view.wallets
            .iter()
            .map(|wallet| {
                format!(
                    r#"<li class="list-group-item d-flex justify-content-between"><span>{} <small class="text-muted">{}</small></span><span>{}</span></li>"#,
                    escape(&wallet.wallet_name),
                    escape(&wallet.wallet_type),
                    Money::new(wallet.balance),
                )
            })
            .collect()
    };

    let rows: String = view.transactions.iter().map(|tx| transaction_row(tx)).collect();
    let rows = if rows.is_empty() {
        r#"<tr><td colspan="5" class="text-muted">No transactions.</td></tr>"#.to_string()
    } else {
        rows
    };

    let query = escape(view.query);
    let body = format!(
        r#"<div class="row g-4">
  <div class="col-lg-4">
    <div class="card mb-4"><div class="card-body">
      <div class="text-muted">Total balance</div>
      <div class="display-6">{total}</div>
    </div></div>
    <div class="card mb-4">
      <div class="card-header d-flex justify-content-between">Wallets <a href="/wallets/new">+ Add</a></div>
      <ul class="list-group list-group-flush">{wallets}</ul>
    </div>
    <div class="card"><div class="card-header">Expenses by category</div>
      <div class="card-body"><canvas id="expenseChart"></canvas></div>
    </div>
  </div>
  <div class="col-lg-8">
    <form class="d-flex mb-3" method="get" action="/">
      <input class="form-control me-2" name="q" value="{query}" placeholder="Search description, category, amount or date">
      <button class="btn btn-outline-primary me-2" type="submit">Search</button>
      <button class="btn btn-outline-secondary" type="submit" formaction="/transactions/export">CSV</button>
    </form>
    <table class="table table-sm bg-white">
      <thead><tr><th>Date</th><th>Description</th><th>Category</th><th>Wallet</th><th class="text-end">Amount</th></tr></thead>
      <tbody>{rows}</tbody>
    </table>
  </div>
</div>
<script src="{CHART_JS}"></script>
<script>
new Chart(document.getElementById('expenseChart'), {{
  type: 'doughnut',
  data: {{ labels: {labels}, datasets: [{{ data: {values} }}] }}
}});
</script>"#,
        total = Money::new(view.total_balance),
        labels = script_json(&view.expenses.labels()),
        values = script_json(&view.expenses.values()),
    );

    layout("Dashboard", Some(view.username), view.flash, &body)
}

/// Sub-categories are indented under their parent.
fn category_option(category: &FlatCategory) -> String {
    let class = if category.is_child { r#" class="ps-4""# } else { "" };
    format!(
        r#"<option value="{}"{class}>{}</option>"#,
        category.id,
        escape(&category.display_name)
    )
}

pub struct TransactionFormView<'a> {
    pub username: &'a str,
    pub flash: Option<&'a Flash>,
    pub mode: TransactionType,
    pub wallets: &'a [Wallet],
    pub categories: &'a [FlatCategory],
    /// Default for the date input, `YYYY-MM-DDTHH:MM`.
    pub now: &'a str,
}

fn wallet_options(wallets: &[Wallet]) -> String {
    wallets
        .iter()
        .map(|w| {
            format!(
                r#"<option value="{}">{} ({})</option>"#,
                w.id,
                escape(&w.wallet_name),
                Money::new(w.balance)
            )
        })
        .collect()
}

pub fn transaction_form_page(view: &TransactionFormView<'_>) -> Html<String> {
    let tabs: String = [
        TransactionType::Expense,
        TransactionType::Income,
        TransactionType::Transfer,
    ]
    .iter()
    .map(|kind| {
        let active = if *kind == view.mode { " active" } else { "" };
        format!(
            r#"<li class="nav-item"><a class="nav-link{active}" href="/transactions/new?mode={kind}">{kind}</a></li>"#
        )
    })
    .collect();

    let wallets = wallet_options(view.wallets);
    let target = if view.mode == TransactionType::Transfer {
        format!(
            r#"<div class="mb-3">
  <label class="form-label" for="target_wallet_id">To wallet</label>
  <select class="form-select" id="target_wallet_id" name="target_wallet_id" required>{wallets}</select>
</div>"#
        )
    } else {
        let options: String = view
            .categories
            .iter()
            .map(category_option)
            .collect();
        let kind = view
            .mode
            .category_type()
            .map(CategoryType::as_str)
            .unwrap_or_default();
        format!(
            r#"<div class="mb-3">
  <label class="form-label" for="category_id">Category</label>
  <select class="form-select" id="category_id" name="category_id">
    <option value="">Uncategorized</option>{options}
  </select>
  <a class="small" href="/categories/new?type={kind}">+ New category</a>
</div>"#
        )
    };

    let body = format!(
        r#"<h1 class="h3 mb-3">New transaction</h1>
<ul class="nav nav-tabs mb-3">{tabs}</ul>
<form method="post" action="/transactions/new?mode={mode}" class="col-md-6">
  <input type="hidden" name="type" value="{mode}">
  <div class="mb-3">
    <label class="form-label" for="wallet_id">Wallet</label>
    <select class="form-select" id="wallet_id" name="wallet_id" required>{wallets}</select>
  </div>
  {target}
  <div class="mb-3">
    <label class="form-label" for="amount">Amount</label>
    <input class="form-control" id="amount" name="amount" inputmode="numeric" placeholder="1.500.000" required>
  </div>
  <div class="mb-3">
    <label class="form-label" for="description">Description</label>
    <input class="form-control" id="description" name="description">
  </div>
  <div class="mb-3">
    <label class="form-label" for="transaction_date">Date</label>
    <input class="form-control" id="transaction_date" name="transaction_date" type="datetime-local" value="{now}" required>
  </div>
  <button class="btn btn-primary" type="submit">Save</button>
</form>"#,
        mode = view.mode,
        now = escape(view.now),
    );

    layout("New transaction", Some(view.username), view.flash, &body)
}

pub fn wallet_form_page(username: &str, flash: Option<&Flash>) -> Html<String> {
    let body = r#"<h1 class="h3 mb-3">New wallet</h1>
<form method="post" action="/wallets/new" class="col-md-6">
  <div class="mb-3">
    <label class="form-label" for="wallet_name">Name</label>
    <input class="form-control" id="wallet_name" name="wallet_name" required>
  </div>
  <div class="mb-3">
    <label class="form-label" for="wallet_type">Type</label>
    <select class="form-select" id="wallet_type" name="wallet_type">
      <option value="CASH">Cash</option>
      <option value="BANK">Bank</option>
      <option value="E_WALLET">E-wallet</option>
    </select>
  </div>
  <div class="mb-3">
    <label class="form-label" for="balance">Opening balance</label>
    <input class="form-control" id="balance" name="balance" inputmode="numeric" value="0">
  </div>
  <button class="btn btn-primary" type="submit">Create</button>
</form>"#;
    layout("New wallet", Some(username), flash, body)
}

pub fn category_form_page(
    username: &str,
    flash: Option<&Flash>,
    selected: CategoryType,
    parents: &[Category],
) -> Html<String> {
    let types: String = [CategoryType::Expense, CategoryType::Income]
        .iter()
        .map(|kind| {
            let sel = if *kind == selected { " selected" } else { "" };
            format!(r#"<option value="{kind}"{sel}>{kind}</option>"#)
        })
        .collect();
    let parents: String = parents
        .iter()
        .filter(|c| c.is_top_level())
        .map(|c| {
            format!(
                r#"<option value="{}">{} ({})</option>"#,
                c.id,
                escape(&c.name),
                c.category_type
            )
        })
        .collect();

    let body = format!(
        r#"<h1 class="h3 mb-3">New category</h1>
<form method="post" action="/categories/new" class="col-md-6">
  <div class="mb-3">
    <label class="form-label" for="name">Name</label>
    <input class="form-control" id="name" name="name" required>
  </div>
  <div class="mb-3">
    <label class="form-label" for="type">Type</label>
    <select class="form-select" id="type" name="type">{types}</select>
  </div>
  <div class="mb-3">
    <label class="form-label" for="parent_id">Parent</label>
    <select class="form-select" id="parent_id" name="parent_id">
      <option value="">None (top level)</option>{parents}
    </select>
  </div>
  <button class="btn btn-primary" type="submit">Create</button>
</form>"#
    );
    layout("New category", Some(username), flash, &body)
}

pub fn calendar_page(username: &str, events: &[CalendarEvent]) -> Html<String> {
    let body = format!(
        r#"<h1 class="h3 mb-3">Calendar</h1>
<div id="calendar" class="bg-white p-3"></div>
<script src="{FULLCALENDAR_JS}"></script>
<script>
document.addEventListener('DOMContentLoaded', function () {{
  new FullCalendar.Calendar(document.getElementById('calendar'), {{
    initialView: 'dayGridMonth',
    events: {events}
  }}).render();
}});
</script>"#,
        events = script_json(events),
    );
    layout("Calendar", Some(username), None, &body)
}

pub struct StatisticsView<'a> {
    pub username: &'a str,
    pub totals: Totals,
    pub income: &'a CategorySums,
    pub expenses: &'a CategorySums,
    pub wallet_labels: &'a [String],
    pub wallet_data: &'a [i64],
}

fn signed_net(net: i128) -> String {
    // |income - expense| never exceeds the larger of the two.
    let amount = u64::try_from(net.unsigned_abs()).unwrap_or(u64::MAX);
    let sign = if net < 0 { "-" } else { "" };
    format!("{sign}{}", format_amount(amount))
}

fn breakdown_list(sums: &CategorySums) -> String {
    if sums.is_empty() {
        return r#"<li class="list-group-item text-muted">Nothing yet.</li>"#.to_string();
    }
    sums.iter()
        .map(|(label, amount)| {
            format!(
                r#"<li class="list-group-item d-flex justify-content-between"><span>{}</span><span>{}</span></li>"#,
                escape(label),
                format_amount(amount)
            )
        })
        .collect()
}

pub fn statistics_page(view: &StatisticsView<'_>) -> Html<String> {
    let body = format!(
        r#"<h1 class="h3 mb-3">Statistics</h1>
<div class="row g-4">
  <div class="col-md-6">
    <div class="card"><div class="card-header">Income vs expense</div>
      <div class="card-body">
        <canvas id="flowChart"></canvas>
        <p class="mt-3 mb-0">Income <strong class="text-success">{income}</strong>,
        expense <strong class="text-danger">{expense}</strong>,
        net <strong>{net}</strong></p>
      </div>
    </div>
  </div>
  <div class="col-md-6">
    <div class="card"><div class="card-header">Wallet balances</div>
      <div class="card-body"><canvas id="walletChart"></canvas></div>
    </div>
  </div>
  <div class="col-md-6">
    <div class="card"><div class="card-header">Income by category</div>
      <ul class="list-group list-group-flush">{income_list}</ul></div>
  </div>
  <div class="col-md-6">
    <div class="card"><div class="card-header">Expense by category</div>
      <ul class="list-group list-group-flush">{expense_list}</ul></div>
  </div>
</div>
<script src="{CHART_JS}"></script>
<script>
new Chart(document.getElementById('flowChart'), {{
  type: 'pie',
  data: {{ labels: ['Income', 'Expense'], datasets: [{{ data: {flow}, backgroundColor: ['#198754', '#dc3545'] }}] }}
}});
new Chart(document.getElementById('walletChart'), {{
  type: 'bar',
  data: {{ labels: {wallet_labels}, datasets: [{{ label: 'Balance', data: {wallet_data} }}] }}
}});
</script>"#,
        income = format_amount(view.totals.income),
        net = signed_net(view.totals.net()),
        expense = format_amount(view.totals.expense),
        income_list = breakdown_list(view.income),
        expense_list = breakdown_list(view.expenses),
        flow = script_json(&[view.totals.income, view.totals.expense]),
        wallet_labels = script_json(view.wallet_labels),
        wallet_data = script_json(view.wallet_data),
    );
    layout("Statistics", Some(view.username), None, &body)
}
