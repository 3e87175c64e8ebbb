//! Rep 个人页、404 页面与 vCard 渲染
//!
//! 所有来自数据库的字段都经过 HTML 转义。页面脚本从 body 的
//! data 属性读取 rep id，加载时上报 TAP，打开表单时上报 VIEW。

use crate::storage::Rep;
use crate::utils::escape_html;

/// 未设置 title 时的默认头衔
const DEFAULT_TITLE: &str = "Roofing Specialist";

const PAGE_STYLE: &str = r#"
*{box-sizing:border-box}
body{margin:0;min-height:100vh;background:#020617;color:#e2e8f0;font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",sans-serif;display:flex;justify-content:center;padding:32px 16px}
.wrap{width:100%;max-width:384px}
.card{background:#0f172a;border:1px solid #1e293b;border-radius:16px;overflow:hidden;margin-bottom:16px}
.banner{height:96px;background:linear-gradient(135deg,#f97316,#c2410c);position:relative}
.avatar{position:absolute;bottom:-32px;left:20px;width:64px;height:64px;border-radius:12px;border:4px solid #0f172a;background:#334155;display:flex;align-items:center;justify-content:center;font-weight:700;font-size:20px;object-fit:cover}
.body{padding:48px 20px 20px}
h1{font-size:20px;margin:0}
h2{font-size:16px;margin:0 0 8px}
.muted{color:#94a3b8;font-size:14px;margin:4px 0 0}
.actions{display:flex;gap:8px;margin-top:16px}
.btn{flex:1;display:block;text-align:center;padding:10px;border-radius:12px;background:#1e293b;color:#fff;text-decoration:none;font-size:14px;border:0;cursor:pointer}
.btn-primary{background:#f97316;width:100%;margin-top:8px}
.btn-outline{background:transparent;border:1px solid #f97316;color:#fb923c;width:100%;margin-top:8px}
.pad{padding:20px}
input,textarea{width:100%;padding:10px;margin-top:8px;border-radius:8px;border:1px solid #334155;background:#020617;color:#e2e8f0;font-size:14px}
.error{color:#fca5a5;font-size:12px;min-height:16px;margin-top:8px}
.hidden{display:none}
"#;

const PAGE_SCRIPT: &str = r#"
(function () {
  var repId = Number(document.body.dataset.repId);
  function track(type, meta) {
    fetch("/events", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ repId: repId, type: type, meta: meta || {} })
    }).catch(function () {});
  }
  track("TAP", { path: window.location.pathname });

  var cta = document.getElementById("cta");
  var formCard = document.getElementById("form-card");
  var done = document.getElementById("done");
  var openBtn = document.getElementById("open-form");
  if (openBtn) {
    openBtn.addEventListener("click", function () {
      cta.classList.add("hidden");
      formCard.classList.remove("hidden");
      track("VIEW", { step: "form" });
    });
  }

  var form = document.getElementById("lead-form");
  if (form) {
    form.addEventListener("submit", function (e) {
      e.preventDefault();
      var data = { repId: repId };
      new FormData(form).forEach(function (v, k) { data[k] = v; });
      var err = document.getElementById("form-error");
      if (!String(data.name || "").trim() || (!String(data.phone || "").trim() && !String(data.email || "").trim())) {
        err.textContent = "Please enter your name and at least a phone or email.";
        return;
      }
      fetch("/leads", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify(data)
      }).then(function (res) {
        if (res.ok) {
          formCard.classList.add("hidden");
          done.classList.remove("hidden");
          return;
        }
        return res.json().then(function (body) {
          err.textContent = body.error || "Something went wrong. Please try again.";
        });
      }).catch(function () {
        err.textContent = "Something went wrong. Please try again.";
      });
    });
  }
})();
"#;

/// 姓名首字母（最多两个）
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Rep 个人页
pub fn profile_page(rep: &Rep) -> String {
    let name = escape_html(&rep.name);
    let title = escape_html(rep.title.as_deref().unwrap_or(DEFAULT_TITLE));
    let company = rep
        .company
        .as_deref()
        .map(|c| format!(" &middot; {}", escape_html(c)))
        .unwrap_or_default();

    let avatar = match rep.photo_url.as_deref() {
        Some(url) => format!(
            r#"<img class="avatar" src="{}" alt="{}">"#,
            escape_html(url),
            name
        ),
        None => format!(
            r#"<div class="avatar">{}</div>"#,
            escape_html(&initials(&rep.name))
        ),
    };

    let bio = rep
        .bio
        .as_deref()
        .map(|b| format!(r#"<p class="muted">{}</p>"#, escape_html(b)))
        .unwrap_or_default();

    let mut actions = String::new();
    if let Some(phone) = rep.phone.as_deref() {
        actions.push_str(&format!(
            r#"<a class="btn" href="tel:{}">Call</a>"#,
            escape_html(phone)
        ));
    }
    if let Some(email) = rep.email.as_deref() {
        actions.push_str(&format!(
            r#"<a class="btn" href="mailto:{}">Email</a>"#,
            escape_html(email)
        ));
    }
    if let Some(phone) = rep.phone.as_deref() {
        actions.push_str(&format!(
            r#"<a class="btn" href="sms:{}">Text</a>"#,
            escape_html(phone)
        ));
    }

    let cta_action = match rep.cal_link.as_deref() {
        Some(link) => format!(
            r#"<a class="btn btn-primary" href="{}" target="_blank" rel="noopener noreferrer">Book Free Inspection</a>"#,
            escape_html(link)
        ),
        None => r#"<button class="btn btn-primary" id="open-form" type="button">Request Free Inspection</button><p class="muted">We'll reach out within 24 hours</p>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{name}</title>
<style>{style}</style>
</head>
<body data-rep-id="{id}">
<div class="wrap">
  <div class="card">
    <div class="banner">{avatar}</div>
    <div class="body">
      <h1>{name}</h1>
      <p class="muted">{title}{company}</p>
      {bio}
      <div class="actions">{actions}</div>
      <a class="btn btn-outline" href="/tap/{id}/contact.vcf">Save Contact</a>
    </div>
  </div>
  <div class="card pad" id="cta">
    <h2>Free Roof Inspection</h2>
    <p class="muted">Check if your roof qualifies for insurance coverage. No cost, no obligation.</p>
    {cta_action}
  </div>
  <div class="card pad hidden" id="form-card">
    <h2>Your Info</h2>
    <form id="lead-form">
      <input name="name" placeholder="Your name *" required>
      <input name="phone" type="tel" placeholder="Phone number">
      <input name="email" type="email" placeholder="Email (optional)">
      <input name="address" placeholder="Property address">
      <textarea name="notes" rows="2" placeholder="Any details? (hail damage, age of roof, etc.)"></textarea>
      <div class="error" id="form-error"></div>
      <button class="btn btn-primary" type="submit">Send Request</button>
    </form>
  </div>
  <div class="card pad hidden" id="done">
    <h2>Request received</h2>
    <p class="muted">{name} will be in touch shortly.</p>
  </div>
</div>
<script>{script}</script>
</body>
</html>"#,
        id = rep.id,
        name = name,
        title = title,
        company = company,
        avatar = avatar,
        bio = bio,
        actions = actions,
        cta_action = cta_action,
        style = PAGE_STYLE,
        script = PAGE_SCRIPT,
    )
}

/// 通用 404 页面（不区分 id 格式错误与 rep 不存在）
pub fn not_found_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>Not Found</title><style>{}</style></head>
<body><div class="wrap"><div class="card pad"><h2>This card isn't active</h2><p class="muted">The profile you're looking for doesn't exist or is no longer available.</p></div></div></body>
</html>"#,
        PAGE_STYLE
    )
}

/// 通用 500 页面，不暴露错误细节
pub fn server_error_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>Something went wrong</title><style>{}</style></head>
<body><div class="wrap"><div class="card pad"><h2>Something went wrong</h2><p class="muted">We couldn't load this card right now. Please tap again in a moment.</p></div></div></body>
</html>"#,
        PAGE_STYLE
    )
}

/// vCard 文本值转义（RFC 6350 3.4）
fn escape_vcard(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// vCard 3.0；`base_url` 存在时附带个人页 URL
pub fn vcard(rep: &Rep, base_url: Option<&str>) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", escape_vcard(&rep.name)),
        format!(
            "TITLE:{}",
            escape_vcard(rep.title.as_deref().unwrap_or(DEFAULT_TITLE))
        ),
    ];
    if let Some(phone) = rep.phone.as_deref() {
        lines.push(format!("TEL:{}", escape_vcard(phone)));
    }
    if let Some(email) = rep.email.as_deref() {
        lines.push(format!("EMAIL:{}", escape_vcard(email)));
    }
    if let Some(company) = rep.company.as_deref() {
        lines.push(format!("ORG:{}", escape_vcard(company)));
    }
    if let Some(base) = base_url.map(|b| b.trim_end_matches('/')).filter(|b| !b.is_empty()) {
        lines.push(format!("URL:{}/tap/{}", base, rep.id));
    }
    lines.push("END:VCARD".to_string());

    let mut card = lines.join("\r\n");
    card.push_str("\r\n");
    card
}

/// 下载文件名：空格替换为下划线，其它非字母数字字符去掉
pub fn vcard_filename(rep: &Rep) -> String {
    let stem: String = rep
        .name
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect();

    if stem.is_empty() {
        format!("rep_{}.vcf", rep.id)
    } else {
        format!("{}.vcf", stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rep() -> Rep {
        let now = Utc::now();
        Rep {
            id: 7,
            name: "Rep <One>".to_string(),
            phone: Some("555-111-1111".to_string()),
            email: None,
            title: None,
            company: Some("Swany; Roofing".to_string()),
            bio: None,
            photo_url: None,
            cal_link: None,
            is_active: true,
            redirect_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_profile_page_escapes_and_embeds_id() {
        let html = profile_page(&rep());
        assert!(html.contains(r#"data-rep-id="7""#));
        assert!(html.contains("Rep &lt;One&gt;"));
        assert!(!html.contains("Rep <One>"));
        assert!(html.contains("tel:555-111-1111"));
        assert!(!html.contains("mailto:"));
        assert!(html.contains(r#"id="open-form""#));
        assert!(html.contains("/tap/7/contact.vcf"));
    }

    #[test]
    fn test_profile_page_uses_cal_link_when_present() {
        let mut rep = rep();
        rep.cal_link = Some("https://cal.com/rep-one".to_string());
        let html = profile_page(&rep);
        assert!(html.contains("https://cal.com/rep-one"));
        assert!(!html.contains(r#"id="open-form""#));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Rep One"), "RO");
        assert_eq!(initials("ada lovelace byron"), "AL");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_vcard() {
        let card = vcard(&rep(), None);
        assert!(card.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(card.contains("FN:Rep <One>\r\n"));
        assert!(card.contains("TITLE:Roofing Specialist\r\n"));
        assert!(card.contains("ORG:Swany\\; Roofing\r\n"));
        assert!(!card.contains("EMAIL:"));
        assert!(card.ends_with("END:VCARD\r\n"));
        assert!(!card.contains("URL:"));
    }

    #[test]
    fn test_vcard_profile_url() {
        let card = vcard(&rep(), Some("https://cards.example.com/"));
        assert!(card.contains("URL:https://cards.example.com/tap/7\r\n"));

        let card = vcard(&rep(), Some(""));
        assert!(!card.contains("URL:"));
    }

    #[test]
    fn test_vcard_filename() {
        assert_eq!(vcard_filename(&rep()), "Rep_One.vcf");

        let mut unnamed = rep();
        unnamed.name = "<>".to_string();
        assert_eq!(vcard_filename(&unnamed), "rep_7.vcf");
    }

    #[test]
    fn test_error_pages_are_generic() {
        let missing = not_found_page();
        assert!(missing.contains("isn't active"));

        let failed = server_error_page();
        assert!(failed.starts_with("<!DOCTYPE html>"));
        assert!(failed.contains("Something went wrong"));
    }
}
