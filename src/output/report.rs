use super::DashboardSnapshot;

fn json_for_script_tag(value: &str) -> String {
    value.replace("</", "<\\/")
}

pub fn render_html(snapshot: &DashboardSnapshot) -> Vec<u8> {
    let json = serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());
    let json = json_for_script_tag(&json);

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Towerwatch Dashboard</title>
  <script src="https://cdn.tailwindcss.com?plugins=forms,container-queries"></script>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"/>
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css"/>
  <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css"/>
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
  <script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    body {{ font-family: 'Inter', sans-serif; }}
    #map {{ height: 420px; }}
  </style>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <script type="application/json" id="dashboard-data">{json}</script>
  <header class="flex items-center justify-between border-b border-slate-200 bg-white px-8 py-4">
    <h2 class="text-xl font-extrabold uppercase tracking-tight">Towerwatch</h2>
    <p id="reference" class="text-sm text-slate-500 font-medium"></p>
  </header>

  <main class="max-w-[1440px] mx-auto w-full px-8 py-10 flex flex-col gap-8">
    <section class="flex flex-wrap items-center gap-4 bg-white rounded-2xl border border-slate-200 p-5 shadow-sm">
      <div class="flex flex-col">
        <span class="text-xs font-bold text-slate-500 uppercase">Total towers</span>
        <span id="totalTowers" class="text-4xl font-extrabold">0</span>
      </div>
      <div class="flex flex-col ml-8">
        <span class="text-xs font-bold text-slate-500 uppercase">Antennas</span>
        <span id="totalAntennas" class="text-4xl font-extrabold">0</span>
      </div>
      <div id="filters" class="flex flex-wrap items-center gap-3 ml-auto">
        <select id="filter-region" class="appearance-none bg-slate-50 border border-slate-200 rounded-xl text-xs font-bold px-5 py-3 pr-10 text-slate-700 cursor-pointer"></select>
        <select id="filter-type" class="appearance-none bg-slate-50 border border-slate-200 rounded-xl text-xs font-bold px-5 py-3 pr-10 text-slate-700 cursor-pointer"></select>
        <select id="filter-status" class="appearance-none bg-slate-50 border border-slate-200 rounded-xl text-xs font-bold px-5 py-3 pr-10 text-slate-700 cursor-pointer"></select>
        <button id="filter-reset" class="px-4 py-3 rounded-xl bg-slate-800 text-white text-xs font-bold">Reset</button>
      </div>
    </section>

    <section class="grid grid-cols-1 lg:grid-cols-2 gap-8">
      <div class="bg-white rounded-2xl border border-slate-200 p-5 shadow-sm"><canvas id="pieChart"></canvas></div>
      <div class="bg-white rounded-2xl border border-slate-200 p-5 shadow-sm"><canvas id="barChart"></canvas></div>
    </section>

    <section class="bg-white rounded-2xl border border-slate-200 p-2 shadow-sm"><div id="map"></div></section>

    <section class="bg-white rounded-2xl border border-slate-200 overflow-x-auto shadow-sm">
      <table id="towerTable" class="w-full text-left border-collapse">
        <thead>
          <tr class="bg-slate-50 border-b border-slate-200 text-[11px] uppercase tracking-widest">
            <th class="px-6 py-4">ID</th>
            <th class="px-6 py-4">City</th>
            <th class="px-6 py-4">Type</th>
            <th class="px-6 py-4 text-right">Antennas</th>
            <th class="px-6 py-4">Status</th>
            <th class="px-6 py-4">Last Maintenance</th>
          </tr>
        </thead>
        <tbody class="divide-y divide-slate-100"></tbody>
      </table>
    </section>

    <section class="bg-white rounded-2xl border border-slate-200 p-5 shadow-sm">
      <h3 class="font-extrabold uppercase mb-3">Alerts</h3>
      <ul id="alerts" class="list-disc pl-6 text-sm text-amber-800"></ul>
    </section>
  </main>

  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      function statusClass(status) {{
        if (status === 'Active') return 'bg-emerald-100/50 text-emerald-700';
        if (status === 'Under Maintenance') return 'bg-amber-100/50 text-amber-700';
        return 'bg-rose-100/50 text-rose-700';
      }}

      const data = JSON.parse(document.getElementById('dashboard-data').textContent || '{{}}');
      const inventory = data.inventory || [];
      const options = data.options || {{}};
      const ALL = 'all';

      document.getElementById('reference').textContent =
        `Reference ${{data.reference_date}} / overdue after ${{data.threshold_days}} days`;

      const selects = {{
        region: document.getElementById('filter-region'),
        type: document.getElementById('filter-type'),
        status: document.getElementById('filter-status')
      }};

      function fillSelect(select, label, values, selected) {{
        const list = values.includes(selected) ? values.slice() : values.concat([selected]);
        select.innerHTML = list
          .map(v => `<option value="${{escapeHtml(v)}}">${{escapeHtml(v === ALL ? `${{label}}: ALL` : v)}}</option>`)
          .join('');
        select.value = selected;
      }}

      const c = data.criteria || {{}};
      fillSelect(selects.region, 'REGION', options.regions || [ALL], c.region || ALL);
      fillSelect(selects.type, 'TYPE', options.tower_types || [ALL], c.type || ALL);
      fillSelect(selects.status, 'STATUS', options.statuses || [ALL], c.status || ALL);

      function admits(select, value) {{
        return select.value === ALL || select.value === value;
      }}

      function recordMatchesFilters(r) {{
        return admits(selects.region, r.city) && admits(selects.type, r.type) && admits(selects.status, r.status);
      }}

      function tally(view, key) {{
        const counts = new Map();
        for (const r of view) counts.set(r[key], (counts.get(r[key]) || 0) + 1);
        return Array.from(counts.entries());
      }}

      function renderTable(view) {{
        document.querySelector('#towerTable tbody').innerHTML = view.map(r =>
          `<tr class="hover:bg-slate-50">
            <td class="px-6 py-4 text-sm font-semibold">${{escapeHtml(r.id)}}</td>
            <td class="px-6 py-4 text-sm">${{escapeHtml(r.city)}}</td>
            <td class="px-6 py-4 text-sm">${{escapeHtml(r.type)}}</td>
            <td class="px-6 py-4 text-sm text-right">${{Number(r.antennas || 0)}}</td>
            <td class="px-6 py-4"><span class="${{statusClass(r.status)}} px-3 py-1 rounded-lg text-xs font-bold">${{escapeHtml(r.status)}}</span></td>
            <td class="px-6 py-4 text-sm">${{escapeHtml(r.last_maint)}}</td>
          </tr>`
        ).join('');
      }}

      const charts = {{}};
      function renderCharts(view) {{
        for (const spec of (data.charts || [])) {{
          const byType = spec.slot === 'type_distribution';
          const counts = tally(view, byType ? 'type' : 'city');
          const labels = counts.map(e => e[0]);
          const colors = byType
            ? labels.map((_, i) => data.type_palette[i % data.type_palette.length])
            : data.city_color;
          if (charts[spec.slot]) charts[spec.slot].destroy();
          charts[spec.slot] = new Chart(document.getElementById(spec.kind === 'pie' ? 'pieChart' : 'barChart'), {{
            type: spec.kind,
            data: {{
              labels: labels,
              datasets: [{{ label: spec.title, data: counts.map(e => e[1]), backgroundColor: colors }}]
            }},
            options: {{ plugins: {{ title: {{ display: true, text: spec.title }} }} }}
          }});
        }}
      }}

      const map = L.map('map').setView([20, 78], 5);
      L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png').addTo(map);
      const layer = L.markerClusterGroup();
      map.addLayer(layer);
      map.on('popupopen', function(e) {{
        const btn = e.popup.getElement().querySelector('button[data-report]');
        if (btn) btn.addEventListener('click', function() {{ alert(`Report for ${{btn.dataset.report}}`); }});
      }});

      function renderMarkers(view) {{
        layer.clearLayers();
        for (const r of view) {{
          const m = r.marker;
          if (!m) continue;
          const p = m.popup;
          const marker = L.circleMarker([m.lat, m.lng], {{ radius: 8, color: m.color }});
          marker.bindPopup(
            `<b>${{escapeHtml(p.id)}}</b><br>${{escapeHtml(p.city)}}<br>Type: ${{escapeHtml(p.type)}}<br>Status: ${{escapeHtml(p.status)}}<br>` +
            `<button data-report="${{escapeHtml(p.report.tower_id)}}" class="mt-2 px-3 py-1 rounded bg-slate-800 text-white text-xs">View Report</button>`
          );
          layer.addLayer(marker);
        }}
      }}

      function renderAlerts(view) {{
        const list = document.getElementById('alerts');
        list.innerHTML = '';
        for (const r of view) {{
          if (!r.alert) continue;
          const li = document.createElement('li');
          li.textContent = r.alert.message;
          list.appendChild(li);
        }}
      }}

      function render() {{
        const view = inventory.filter(recordMatchesFilters);
        renderTable(view);
        renderMarkers(view);
        renderCharts(view);
        renderAlerts(view);
        document.getElementById('totalTowers').textContent = view.length;
        document.getElementById('totalAntennas').textContent =
          view.reduce((sum, r) => sum + Number(r.antennas || 0), 0);
      }}

      for (const select of Object.values(selects)) {{
        select.addEventListener('change', render);
      }}
      document.getElementById('filter-reset').addEventListener('click', function() {{
        for (const select of Object.values(selects)) select.value = ALL;
        render();
      }});

      render();
    }})();
  </script>
</body>
</html>"####,
    );

    html.into_bytes()
}
