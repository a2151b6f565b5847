//! Thin HTML rendering seam. Handlers hand a result object here and get an
//! `Html<String>` back; nothing outside this module builds markup.

use axum::response::Html;

use crate::providers::news::Headline;
use crate::store::{AirQualityRecord, ExchangeRateRecord, User, WeatherRecord};

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, username: Option<&str>, is_admin: bool, body: &str) -> Html<String> {
    let mut nav = String::from(
        r#"<a href="/">Weather</a> <a href="/exchange-rate">Exchange rate</a> <a href="/news">News</a>"#,
    );
    match username {
        Some(name) => {
            nav.push_str(
                r#" <a href="/weather-history">Weather history</a> <a href="/exchange-rate-history">Rate history</a>"#,
            );
            if is_admin {
                nav.push_str(r#" <a href="/admin">Admin</a>"#);
            }
            nav.push_str(&format!(
                r#" <span>{}</span> <a href="/logout">Log out</a>"#,
                escape(name)
            ));
        }
        None => {
            if is_admin {
                // fixed-credential admin has no username-backed account
                nav.push_str(r#" <a href="/admin">Admin</a> <a href="/logout">Log out</a>"#);
            } else {
                nav.push_str(r#" <a href="/login">Log in</a> <a href="/signup">Sign up</a>"#);
            }
        }
    }
    Html(format!(
        "<!doctype html><html><head><title>{}</title></head><body><nav>{}</nav>{}</body></html>",
        escape(title),
        nav,
        body
    ))
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

pub fn index(
    username: Option<&str>,
    is_admin: bool,
    weather: Option<&WeatherRecord>,
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from(
        r#"<h1>Weather lookup</h1>
<form method="post" action="/">
<input name="city" placeholder="City" required>
<button type="submit">Check weather</button>
</form>"#,
    );
    body.push_str(&error_block(error));
    if let Some(record) = weather {
        body.push_str(&format!(
            r#"<div class="weather"><h2>{}</h2><p>{} &deg;C, {}</p><img src="{}" alt="{}">"#,
            escape(&record.city),
            record.temperature,
            escape(&record.description),
            escape(&record.icon),
            escape(&record.description),
        ));
        if let (Some(sunrise), Some(sunset)) = (record.sunrise, record.sunset) {
            body.push_str(&format!("<p>Sunrise {sunrise} / sunset {sunset}</p>"));
        }
        body.push_str("</div>");
    }
    layout("Weather", username, is_admin, &body)
}

pub fn login(message: Option<&str>, error: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Log in</h1>");
    if let Some(message) = message {
        body.push_str(&format!("<p>{}</p>", escape(message)));
    }
    body.push_str(&error_block(error));
    body.push_str(
        r#"<form method="post" action="/login">
<input name="username" placeholder="Username" required>
<input name="password" type="password" placeholder="Password" required>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a></p>"#,
    );
    layout("Log in", None, false, &body)
}

pub fn signup(error: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Sign up</h1>");
    body.push_str(&error_block(error));
    body.push_str(
        r#"<form method="post" action="/signup">
<input name="username" placeholder="Username" required>
<input name="password" type="password" placeholder="Password" required>
<button type="submit">Sign up</button>
</form>"#,
    );
    layout("Sign up", None, false, &body)
}

pub fn weather_history(
    username: &str,
    is_admin: bool,
    records: &[WeatherRecord],
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<h1>Weather history</h1>");
    body.push_str(&error_block(error));
    body.push_str("<table><tr><th>City</th><th>Temp</th><th>Conditions</th><th>When</th></tr>");
    for record in records {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.city),
            record.temperature,
            escape(&record.description),
            record.recorded_at,
        ));
    }
    body.push_str("</table>");
    layout("Weather history", Some(username), is_admin, &body)
}

pub fn exchange_rate(
    username: Option<&str>,
    is_admin: bool,
    from_currency: &str,
    to_currency: &str,
    rate: Option<f64>,
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from(
        r#"<h1>Exchange rate</h1>
<form method="get" action="/exchange-rate">
<input name="from" placeholder="From" value="KZT">
<input name="to" placeholder="To" value="USD">
<button type="submit">Look up</button>
</form>"#,
    );
    body.push_str(&error_block(error));
    if let Some(rate) = rate {
        body.push_str(&format!(
            "<p>1 {} = {} {}</p>",
            escape(from_currency),
            rate,
            escape(to_currency)
        ));
    }
    layout("Exchange rate", username, is_admin, &body)
}

pub fn exchange_rate_history(
    username: &str,
    is_admin: bool,
    records: &[ExchangeRateRecord],
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<h1>Exchange rate history</h1>");
    body.push_str(&error_block(error));
    body.push_str("<table><tr><th>From</th><th>To</th><th>Rate</th><th>When</th></tr>");
    for record in records {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&record.from_currency),
            escape(&record.to_currency),
            record.rate,
            record.recorded_at,
        ));
    }
    body.push_str("</table>");
    layout("Exchange rate history", Some(username), is_admin, &body)
}

pub fn air_quality(
    username: &str,
    is_admin: bool,
    record: Option<&AirQualityRecord>,
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<h1>Air quality</h1>");
    body.push_str(&error_block(error));
    if let Some(record) = record {
        body.push_str(&format!(
            "<p>{}: PM2.5 {} ({})</p>",
            escape(&record.city),
            record.aqi,
            escape(&record.main_pollutant)
        ));
    }
    layout("Air quality", Some(username), is_admin, &body)
}

pub fn news(
    username: Option<&str>,
    is_admin: bool,
    headlines: &[Headline],
    error: Option<&str>,
) -> Html<String> {
    let mut body = String::from("<h1>Headlines</h1>");
    body.push_str(&error_block(error));
    body.push_str("<ul>");
    for headline in headlines {
        let title = escape(&headline.title);
        let source = match &headline.source {
            Some(source) => format!(" <small>{}</small>", escape(source)),
            None => String::new(),
        };
        match &headline.url {
            Some(url) => body.push_str(&format!(
                r#"<li><a href="{}">{}</a>{}</li>"#,
                escape(url),
                title,
                source
            )),
            None => body.push_str(&format!("<li>{title}{source}</li>")),
        }
    }
    body.push_str("</ul>");
    layout("News", username, is_admin, &body)
}

pub fn admin_users(username: &str, users: &[User]) -> Html<String> {
    let mut body = String::from(
        r#"<h1>Users</h1><p><a href="/admin/add-user">Add user</a></p>
<table><tr><th>Username</th><th>Admin</th><th></th><th></th></tr>"#,
    );
    for user in users {
        body.push_str(&format!(
            r#"<tr><td>{}</td><td>{}</td>
<td><a href="/edit-user/{}">Edit</a></td>
<td><form method="post" action="/delete-user"><input type="hidden" name="user_id" value="{}"><button type="submit">Delete</button></form></td></tr>"#,
            escape(&user.username),
            user.is_admin,
            user.id,
            user.id,
        ));
    }
    body.push_str("</table>");
    layout("Admin", Some(username), true, &body)
}

pub fn add_user(username: &str) -> Html<String> {
    let body = r#"<h1>Add user</h1>
<form method="post" action="/admin/add-user">
<input name="username" placeholder="Username" required>
<input name="password" type="password" placeholder="Password" required>
<label><input type="checkbox" name="is_admin"> Admin</label>
<button type="submit">Create</button>
</form>"#;
    layout("Add user", Some(username), true, body)
}

pub fn edit_user(username: &str, target: &User) -> Html<String> {
    let body = format!(
        r#"<h1>Edit user</h1>
<form method="post" action="/users/edit/{}">
<input name="username" value="{}" required>
<input name="password" type="password" placeholder="New password (leave blank to keep)">
<select name="is_admin">
<option value="false"{}>user</option>
<option value="true"{}>admin</option>
</select>
<button type="submit">Save</button>
</form>"#,
        target.id,
        escape(&target.username),
        if target.is_admin { "" } else { " selected" },
        if target.is_admin { " selected" } else { "" },
    );
    layout("Edit user", Some(username), true, &body)
}
