//! HTML reporter: serializes a report page into a self-contained HTML file
//!
//! Every row is pre-rendered in both states and every detail overlay is
//! pre-rendered per grouping, all inside `<template>` elements. A small
//! vanilla JS block swaps them in on `data-action` clicks.

use crate::details::{group_items, render_controls, render_groups, DetailView, GroupBy, OverlayContent};
use crate::dom::{escape_html, Element};
use crate::page::ReportPage;
use crate::table::{CollectionKind, PresentationMode, TableType};
use crate::CellValue;

/// Escapes a string for embedding inside a `<script>` block
fn escape_json_for_script(s: &str) -> String {
    // serde_json already escapes quotes/backslashes; we just need to ensure
    // no </script> can appear inside the block.
    s.replace("</script>", "<\\/script>")
}

fn row_template_id(table: TableType, row: usize, expanded: bool) -> String {
    format!(
        "tpl-{}-{}-{}",
        table.key(),
        row,
        if expanded { "expanded" } else { "collapsed" }
    )
}

/// Reporter that generates a self-contained HTML report
pub struct HtmlReporter {
    title: String,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            title: "Compliance Report".to_string(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Generate the full HTML document
    pub fn report(&self, page: &ReportPage) -> String {
        let config = serde_json::json!({
            "darkMode": page.theme().is_dark(),
            "showMoreIncrement": page.show_more_increment(),
        });

        let mut html = String::with_capacity(32_768);
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"");
        html.push_str(page.theme().data_theme());
        html.push_str("\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>");
        html.push_str(&escape_html(&self.title));
        html.push_str("</title>\n");
        html.push_str(Self::template_style());
        html.push_str("</head>\n<body>\n");

        Element::new("header")
            .child(Element::new("h1").text(self.title.clone()))
            .write_html(&mut html);
        html.push('\n');
        page.to_element().write_html(&mut html);
        html.push('\n');
        if let Some(overlay) = page.overlay_element() {
            overlay.write_html(&mut html);
            html.push('\n');
        }
        for template in self.templates(page) {
            template.write_html(&mut html);
            html.push('\n');
        }

        html.push_str("<script>const CONFIG=");
        html.push_str(&escape_json_for_script(&config.to_string()));
        html.push_str(";</script>\n");
        html.push_str(Self::template_script());
        html.push_str("</body>\n</html>\n");
        html
    }

    /// Row fragments for both states, plus detail fragments for modal tables
    fn templates(&self, page: &ReportPage) -> Vec<Element> {
        let mut out = Vec::new();
        for section in page.sections() {
            let table = section.table();
            let desc = section.descriptor;
            let rows = page.dataset(table).unwrap_or(&[]);

            for (idx, row) in rows.iter().enumerate() {
                for expanded in [false, true] {
                    if let Some(tr) = page.row_fragment(table, idx, expanded) {
                        out.push(
                            Element::new("template")
                                .attr("id", row_template_id(table, idx, expanded))
                                .child(tr),
                        );
                    }
                }

                if desc.presentation != PresentationMode::Modal {
                    continue;
                }
                for (col_idx, col) in desc.columns.iter().enumerate() {
                    let has_items = matches!(row.get(col.name), CellValue::Collection(items) if !items.is_empty());
                    if col.name.is_empty() || !has_items {
                        continue;
                    }
                    match page.details_content(table, idx, col_idx) {
                        Ok(content) => out.push(details_template(page, table, idx, col_idx, &content)),
                        Err(e) => log::warn!("Skipping details template: {}", e),
                    }
                }
            }
        }
        out
    }

    // ─── HTML template pieces ────────────────────────────────────────────

    fn template_style() -> &'static str {
        r##"<style>
:root{--bg:#ffffff;--surface:#f4f5f7;--border:#c9ccd1;--text:#1b1b1b;--muted:#5c5f66;--link:#005ea2;--test-pass:#d5f5d5;--test-fail:#f7d4d4;--test-warning:#fff2c2;--test-bug-color:#e6d9f2;--test-other:#e4e6ea;--test-deleted-color:#7a7d84;--test-error-color:#b50909;--radius:6px}
html[data-theme="dark"]{--bg:#16171b;--surface:#1f2126;--border:#3a3d45;--text:#e6e6e6;--muted:#a0a3ab;--link:#73b3e7;--test-pass:#1e4d2b;--test-fail:#5c1f1f;--test-warning:#5a4a12;--test-bug-color:#3d2a52;--test-other:#33363d;--test-deleted-color:#8a8d94;--test-error-color:#ff8c8c}
*{box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:var(--bg);color:var(--text);line-height:1.5;margin:0 auto;max-width:1400px;padding:1rem 1.5rem}
header h1{font-size:1.5rem;margin:.5rem 0}
hr{border:none;border-top:1px solid var(--border);margin:2rem 0 1rem}

/* ── Tables ── */
table{border-collapse:collapse;width:100%;margin:.5rem 0 1rem}
th,td{border:1px solid var(--border);padding:.4rem .6rem;text-align:left;vertical-align:top;font-size:.875rem}
th{background:var(--surface)}
td[scope="row"]{width:2rem;text-align:center}
.buttons{display:flex;gap:.5rem;margin:.5rem 0}
.buttons button,.view-details-button,button.show-more{background:var(--surface);color:var(--text);border:1px solid var(--border);border-radius:var(--radius);padding:.25rem .6rem;cursor:pointer;font-size:.8125rem}
.chevron,.truncated-dots{background:none;border:none;cursor:pointer;color:var(--link);padding:0 .2rem}
.truncated-dots span{font-weight:700}
html[data-theme="dark"] .chevron img{filter:invert(1)}

/* ── Key/value lists ── */
ul.kv-list,ul.kv-summary,.kv-group ul{margin:0;padding-left:1.1rem}
li.kv-item{margin-bottom:.35rem}
.kv-controls{display:flex;gap:.5rem;align-items:center;margin-bottom:.75rem}
.kv-controls input,.kv-controls select{background:var(--bg);color:var(--text);border:1px solid var(--border);border-radius:var(--radius);padding:.25rem .5rem}
.kv-group h4{margin:.75rem 0 .25rem}

/* ── Details dialog ── */
dialog#details-dialog{background:var(--bg);color:var(--text);border:1px solid var(--border);border-radius:var(--radius);max-width:min(900px,90vw);max-height:85vh;overflow:auto;padding:1rem 1.25rem}
dialog#details-dialog::backdrop{background:rgba(0,0,0,.45)}
.details-header{display:flex;justify-content:space-between;align-items:center;gap:1rem}
.details-header h2{font-size:1.125rem;margin:0}

/* ── Control results ── */
.policy-data tr[data-state="pass"]{background:var(--test-pass)}
.policy-data tr[data-state="fail"]{background:var(--test-fail)}
.policy-data tr[data-state="warning"]{background:var(--test-warning)}
.policy-data tr[data-state="bug"]{background:var(--test-bug-color)}
.policy-data tr[data-state="omitted"],.policy-data tr[data-state="notapplicable"],.policy-data tr[data-state="notimplemented"],.policy-data tr[data-state="thirdparty"]{background:var(--test-other)}
.policy-data tr[data-state="deleted"]{background:var(--test-other);color:var(--test-deleted-color)}
.policy-data tr[data-state="incorrect-shall"]{background:linear-gradient(to right,var(--test-fail),var(--test-pass))}
.policy-data tr[data-state="incorrect-should"]{background:linear-gradient(to right,var(--test-warning),var(--test-pass))}
.policy-data tr[data-state="error"]{background:var(--test-fail)}
.policy-data tr[data-state="error"] td:nth-child(3){color:var(--test-error-color)}

/* ── Show more ── */
p.show-more{color:var(--muted);font-size:.8125rem}

/* ── Theme toggle ── */
.dark-mode-toggle{display:flex;align-items:center;gap:.5rem;justify-content:flex-end}
.switch{position:relative;display:inline-block;width:40px;height:22px}
.switch input{opacity:0;width:0;height:0}
.slider{position:absolute;inset:0;background:var(--border);border-radius:22px;cursor:pointer;transition:background .2s}
.slider:before{content:"";position:absolute;height:16px;width:16px;left:3px;bottom:3px;background:#fff;border-radius:50%;transition:transform .2s}
.switch input:checked+.slider{background:var(--link)}
.switch input:checked+.slider:before{transform:translateX(18px)}
</style>
"##
    }

    fn template_script() -> &'static str {
        r##"<script>
(function(){
"use strict";

/* ── helpers ── */
const $=s=>document.querySelector(s);
const $$=s=>[...document.querySelectorAll(s)];
const dialog=$('#details-dialog');
let opener=null;

/* ── theme ── */
function setTheme(dark){
  document.documentElement.dataset.theme=dark?'dark':'light';
  const text=$('#toggle-text');if(text)text.textContent=dark?'Dark Mode':'Light Mode';
  const toggle=$('#toggle');if(toggle)toggle.checked=dark;
  try{sessionStorage.setItem('darkMode',String(dark))}catch(e){}
}
function mountTheme(){
  let stored=null;
  try{stored=sessionStorage.getItem('darkMode')}catch(e){}
  if(stored===null)stored=String(CONFIG.darkMode);
  setTheme(stored==='true');
}

/* ── rows ── */
const rowEl=(table,row)=>document.querySelector(`table.${table}_table tbody tr[data-row="${row}"]`);
function setRow(table,row,expanded){
  const current=rowEl(table,row);
  const tpl=document.getElementById(`tpl-${table}-${row}-${expanded?'expanded':'collapsed'}`);
  if(!current||!tpl){console.error(`Row ${row} is not rendered in ${table}`);return false}
  current.replaceWith(tpl.content.firstElementChild.cloneNode(true));
  return true;
}
function focusChevron(table,row){
  const tr=rowEl(table,row);
  const c=tr&&tr.querySelector('.chevron');
  if(c)c.focus();
}
function setAll(table,expanded){
  $$(`table.${table}_table tbody tr[data-row]`).forEach(tr=>setRow(table,tr.dataset.row,expanded));
}

/* ── details dialog ── */
function bindDetails(content){
  const search=content.querySelector('#modal-search');
  const group=content.querySelector('#modal-group-by');
  const apply=()=>{
    const term=search?search.value.trim().toLowerCase():'';
    const key=group?group.value:'none';
    content.querySelectorAll('.kv-results').forEach(r=>{
      r.hidden=r.dataset.groupBy!==key;
      r.querySelectorAll('.kv-group').forEach(g=>{
        let n=0;
        g.querySelectorAll('.kv-item').forEach(li=>{
          const hit=!term||(li.dataset.search||'').split('\n').some(v=>v.includes(term));
          li.hidden=!hit;
          if(hit)n++;
        });
        g.querySelector('h4').textContent=`${g.dataset.title} (${n})`;
      });
    });
  };
  if(search)search.addEventListener('input',apply);
  if(group)group.addEventListener('change',apply);
}
function openDetails(btn){
  const content=$('#details-content'),title=$('#details-title'),close=$('#details-close');
  if(!dialog||!content||!title||!close){console.error('Details dialog elements not found');return}
  const {table,row,col}=btn.dataset;
  const tpl=document.getElementById(`tpl-details-${table}-${row}-${col}`);
  if(!tpl){console.error(`No details for ${table} row ${row}`);return}
  opener=btn;
  title.textContent=tpl.dataset.title||'Details';
  content.replaceChildren(tpl.content.cloneNode(true));
  bindDetails(content);
  if(!dialog.open)dialog.showModal();
  close.focus();
}
if(dialog){
  dialog.addEventListener('close',()=>{
    $('#details-content').replaceChildren();
    if(opener&&opener.isConnected)opener.focus();
    opener=null;
  });
}

/* ── show more ── */
function showMore(btn){
  const list=document.getElementById(btn.dataset.list);
  if(!list)return;
  const hidden=[...list.querySelectorAll('li[hidden],tr[hidden]')];
  const step=Math.min(hidden.length,CONFIG.showMoreIncrement);
  hidden.slice(0,step).forEach(e=>e.hidden=false);
  const msg=btn.closest('p.show-more');
  if(hidden.length-step<=0){msg.remove()}
  else{msg.firstChild.textContent=`${hidden.length-step} ${btn.dataset.noun} hidden. `}
}

/* ── actions ── */
document.addEventListener('click',e=>{
  const el=e.target.closest('[data-action]');
  if(!el)return;
  const {action,table,row}=el.dataset;
  switch(action){
    case 'expand-row':if(setRow(table,row,true))focusChevron(table,row);break;
    case 'collapse-row':if(setRow(table,row,false))focusChevron(table,row);break;
    case 'expand-all':setAll(table,true);break;
    case 'collapse-all':setAll(table,false);break;
    case 'open-details':openDetails(el);break;
    case 'close-details':if(dialog&&dialog.open)dialog.close();break;
    case 'toggle-theme':setTheme(el.checked);break;
    case 'show-more':showMore(el);break;
  }
});

/* ── init ── */
mountTheme();

})();
</script>
"##
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlay content for one cell, with one result block per available grouping
fn details_template(
    page: &ReportPage,
    table: TableType,
    row: usize,
    column: usize,
    content: &OverlayContent,
) -> Element {
    let ctx = page.ctx();
    let groupings: Vec<GroupBy> = if content.kind == Some(CollectionKind::Permissions) {
        GroupBy::ALL.to_vec()
    } else {
        vec![GroupBy::None]
    };

    let results = groupings.into_iter().map(|group_by| {
        let view = DetailView {
            search: String::new(),
            group_by,
        };
        let groups = group_items(content.kind, &content.items, &view, ctx.now);
        let block = render_groups(&groups, &ctx.date_format).attr("data-group-by", group_by.key());
        if group_by == GroupBy::None {
            block
        } else {
            block.attr("hidden", "hidden")
        }
    });

    Element::new("template")
        .attr("id", format!("tpl-details-{}-{}-{}", table.key(), row, column))
        .attr("data-title", content.title.clone())
        .child(
            Element::new("div")
                .class("kv-advanced")
                .child(render_controls(content.kind, &content.view))
                .children(results),
        )
}
