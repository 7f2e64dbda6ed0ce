//! Browser client served from the binary: login page, dashboard page and the
//! script that drives both.

use axum::{
    http::header,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::AppState;

/// (path, body) of every embedded asset
const ASSETS: &[(&str, &str)] = &[
    ("login.html", LOGIN_HTML),
    ("dashboard.html", DASHBOARD_HTML),
    ("app.js", APP_JS),
];

pub fn ui_router() -> Router<AppState> {
    let mut router = Router::new().route("/", get(|| async { Redirect::to("/login.html") }));
    for &(name, body) in ASSETS {
        router = router.route(&format!("/{name}"), get(move || async move { asset(name, body) }));
    }
    router
}

fn asset(name: &str, body: &'static str) -> Response {
    let mime_type = mime_guess::from_path(name).first_or_text_plain();
    ([(header::CONTENT_TYPE, mime_type.to_string())], body).into_response()
}

const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Course Registration Admin - Login</title>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: linear-gradient(135deg, #4f46e5 0%, #0ea5e9 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .login-container {
            background: #fff;
            padding: 40px;
            border-radius: 16px;
            box-shadow: 0 8px 32px rgba(15,23,42,0.25);
            width: 100%;
            max-width: 400px;
        }
        .logo { text-align: center; margin-bottom: 30px; color: #1e293b; }
        .logo h1 { font-size: 26px; margin-bottom: 5px; }
        .logo p { color: #64748b; font-size: 14px; }
        .form-group { margin-bottom: 20px; }
        label { display: block; color: #475569; margin-bottom: 8px; font-size: 14px; }
        input[type="text"], input[type="password"] {
            width: 100%;
            padding: 12px 16px;
            border: 1px solid #cbd5e1;
            border-radius: 8px;
            font-size: 16px;
            transition: border-color 0.3s;
        }
        input:focus { outline: none; border-color: #4f46e5; }
        button {
            width: 100%;
            padding: 14px;
            display: flex;
            align-items: center;
            justify-content: center;
            gap: 8px;
            background: #4f46e5;
            border: none;
            border-radius: 8px;
            color: #fff;
            font-size: 16px;
            font-weight: 600;
            cursor: pointer;
        }
        button:disabled { opacity: 0.6; cursor: wait; }
        button svg { width: 18px; height: 18px; }
        .error {
            display: none;
            background: rgba(239,68,68,0.1);
            border: 1px solid #ef4444;
            color: #b91c1c;
            padding: 12px;
            border-radius: 8px;
            margin-bottom: 20px;
            text-align: center;
        }
    </style>
</head>
<body>
    <div class="login-container">
        <div class="logo">
            <h1>🎓 Course Registration</h1>
            <p>Faculty of Computing Admin</p>
        </div>
        <div class="error" id="errorMessage"></div>
        <form id="loginForm">
            <div class="form-group">
                <label for="username">Username</label>
                <input type="text" id="username" name="username" required autocomplete="username">
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required autocomplete="current-password">
            </div>
            <button type="submit"><span>Sign In</span><svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M5 12h14M12 5l7 7-7 7"></path></svg></button>
        </form>
    </div>
    <script src="app.js"></script>
</body>
</html>"#;

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Course Registration Admin Dashboard</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f1f5f9;
            color: #1e293b;
            min-height: 100vh;
        }
        .header {
            background: #fff;
            padding: 20px 30px;
            display: flex;
            justify-content: space-between;
            align-items: center;
            border-bottom: 1px solid #e2e8f0;
        }
        .header h1 { font-size: 22px; }
        .user-info { display: flex; align-items: center; gap: 20px; color: #475569; }
        .logout {
            background: none;
            border: 1px solid #ef4444;
            color: #ef4444;
            padding: 8px 16px;
            border-radius: 6px;
            cursor: pointer;
        }
        .container { padding: 30px; max-width: 1400px; margin: 0 auto; }
        .stats-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }
        .card {
            background: #fff;
            border-radius: 12px;
            border: 1px solid #e2e8f0;
            padding: 24px;
        }
        .stat-card h3 {
            color: #64748b;
            font-size: 12px;
            text-transform: uppercase;
            letter-spacing: 1px;
            margin-bottom: 10px;
        }
        .stat-card .value { font-size: 32px; font-weight: 700; color: #4f46e5; }
        .charts-grid {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
            gap: 20px;
            margin-bottom: 30px;
        }
        .chart-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 16px; }
        .chart-header h2, .section h2 { font-size: 16px; }
        .chart-box { position: relative; height: 300px; }
        .chart-toggle { display: flex; gap: 6px; }
        .toggle-btn {
            border: 1px solid #cbd5e1;
            background: #fff;
            padding: 4px 12px;
            border-radius: 6px;
            cursor: pointer;
        }
        .toggle-btn.active { background: #4f46e5; color: #fff; border-color: #4f46e5; }
        .section { margin-bottom: 30px; }
        .tabs { display: flex; gap: 8px; margin: 16px 0; flex-wrap: wrap; }
        .tab {
            border: 1px solid #cbd5e1;
            background: #fff;
            padding: 6px 14px;
            border-radius: 999px;
            cursor: pointer;
        }
        .tab.active { background: #0ea5e9; border-color: #0ea5e9; color: #fff; }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 12px 14px; text-align: left; border-bottom: 1px solid #e2e8f0; }
        th { font-size: 12px; text-transform: uppercase; letter-spacing: 1px; color: #64748b; }
        .activity-list { list-style: none; }
        .activity-list li { display: flex; gap: 14px; padding: 12px 0; border-bottom: 1px solid #e2e8f0; }
        .activity-icon {
            width: 36px;
            height: 36px;
            border-radius: 50%;
            background: #eef2ff;
            display: flex;
            align-items: center;
            justify-content: center;
        }
        .activity-meta { color: #64748b; font-size: 13px; }
        .settings-form { display: grid; grid-template-columns: repeat(auto-fit, minmax(260px, 1fr)); gap: 16px; }
        .settings-form label { display: block; color: #475569; font-size: 14px; margin-bottom: 6px; }
        .settings-form input[type="text"], .settings-form input[type="date"], .settings-form input[type="number"] {
            width: 100%;
            padding: 10px 12px;
            border: 1px solid #cbd5e1;
            border-radius: 8px;
        }
        .save-btn {
            margin-top: 20px;
            background: #4f46e5;
            color: #fff;
            border: none;
            padding: 12px 24px;
            border-radius: 8px;
            cursor: pointer;
        }
        .settings-message { margin-top: 12px; color: #059669; display: none; }
    </style>
</head>
<body>
    <div class="header">
        <h1>🎓 Course Registration Admin</h1>
        <div class="user-info">
            <span id="adminName"></span>
            <button class="logout" id="logoutBtn">Logout</button>
        </div>
    </div>

    <div class="container">
        <div class="stats-grid">
            <div class="card stat-card"><h3>Total Students</h3><div class="value" id="totalStudents">0</div></div>
            <div class="card stat-card"><h3>Total Courses</h3><div class="value" id="totalCourses">0</div></div>
            <div class="card stat-card"><h3>Total Registrations</h3><div class="value" id="totalRegistrations">0</div></div>
            <div class="card stat-card"><h3>Pending Registrations</h3><div class="value" id="pendingRegistrations">0</div></div>
        </div>

        <div class="charts-grid">
            <div class="card">
                <div class="chart-header"><h2>Students per Course</h2></div>
                <div class="chart-box"><canvas id="studentsPerCourseChart"></canvas></div>
            </div>
            <div class="card">
                <div class="chart-header">
                    <h2>Faculty of Computing Enrollment</h2>
                    <div class="chart-toggle">
                        <button class="toggle-btn active" data-years="5" onclick="toggleEnrollmentChart(5)">5 Years</button>
                        <button class="toggle-btn" data-years="10" onclick="toggleEnrollmentChart(10)">10 Years</button>
                    </div>
                </div>
                <div class="chart-box"><canvas id="enrollmentTrendChart"></canvas></div>
            </div>
            <div class="card">
                <div class="chart-header"><h2>Registration Status</h2></div>
                <div class="chart-box"><canvas id="registrationStatusChart"></canvas></div>
            </div>
        </div>

        <div class="card section">
            <h2>Pending Registrations</h2>
            <div class="tabs" id="pendingTabs"></div>
            <table>
                <thead>
                    <tr><th>Student ID</th><th>Name</th><th>Course</th><th>Submitted</th></tr>
                </thead>
                <tbody id="pendingTable"></tbody>
            </table>
        </div>

        <div class="card section">
            <h2>Recent Activity</h2>
            <ul class="activity-list" id="activityList"></ul>
        </div>

        <div class="card section">
            <h2>System Settings</h2>
            <form id="settingsForm">
                <div class="settings-form">
                    <div><label for="semester">Semester</label><input type="text" id="semester" required></div>
                    <div><label for="startDate">Registration Start</label><input type="date" id="startDate" required></div>
                    <div><label for="endDate">Registration End</label><input type="date" id="endDate" required></div>
                    <div><label for="maxCreditHours">Max Credit Hours</label><input type="number" id="maxCreditHours" min="0" required></div>
                    <div><label for="minCreditHours">Min Credit Hours</label><input type="number" id="minCreditHours" min="0" required></div>
                    <div>
                        <label><input type="checkbox" id="registrationOpen"> Registration open</label>
                        <label><input type="checkbox" id="requireAaApproval"> Require academic advisor approval</label>
                        <label><input type="checkbox" id="emailNewRegistrations"> Email on new registrations</label>
                        <label><input type="checkbox" id="emailApprovals"> Email on approvals</label>
                        <label><input type="checkbox" id="dailySummary"> Daily summary email</label>
                    </div>
                </div>
                <button type="submit" class="save-btn">Save Settings</button>
                <div class="settings-message" id="settingsMessage"></div>
            </form>
        </div>
    </div>
    <script src="app.js"></script>
</body>
</html>"##;

const APP_JS: &str = r#"// ===== Configuration =====
const API_BASE = '/api/admin';
const COUNTER_DURATION_MS = 1000;
const ACTIVITY_ICONS = { login: '🔑', settings: '⚙️', check: '✅', download: '⬇️' };

const charts = {};

// ===== Session =====
function setSession(adminName) {
    sessionStorage.setItem('isLoggedIn', 'true');
    sessionStorage.setItem('adminName', adminName);
}

function getSession() {
    return {
        isLoggedIn: sessionStorage.getItem('isLoggedIn') === 'true',
        adminName: sessionStorage.getItem('adminName')
    };
}

function clearSession() {
    sessionStorage.removeItem('isLoggedIn');
    sessionStorage.removeItem('adminName');
}

function checkAuth() {
    const session = getSession();
    if (window.location.pathname.endsWith('dashboard.html') && !session.isLoggedIn) {
        window.location.href = 'login.html';
        return false;
    }
    const nameEl = document.getElementById('adminName');
    if (session.isLoggedIn && nameEl) {
        nameEl.textContent = `Welcome, ${session.adminName}`;
    }
    return true;
}

// ===== API =====
class ApiError extends Error {
    constructor(path, status) {
        super(`${path} failed with status ${status}`);
        this.status = status;
    }

    get rejected() {
        return this.status >= 400 && this.status < 500;
    }
}

async function apiRequest(path, options) {
    const response = await fetch(`${API_BASE}/${path}`, Object.assign({ credentials: 'same-origin' }, options));
    if (response.status === 401) {
        clearSession();
        window.location.href = 'login.html';
        throw new Error('session expired');
    }
    if (!response.ok) {
        throw new ApiError(path, response.status);
    }
    return response.json();
}

function apiGet(path) {
    return apiRequest(path);
}

function apiPost(path, body) {
    return apiRequest(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
    });
}

function escapeHtml(value) {
    return String(value)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;');
}

// ===== Login =====
function bindLoginForm(loginForm) {
    const submitBtn = loginForm.querySelector('button[type="submit"]');
    const idleLabel = submitBtn.innerHTML;
    const errorMessage = document.getElementById('errorMessage');

    loginForm.addEventListener('submit', async function (e) {
        e.preventDefault();
        submitBtn.disabled = true;
        submitBtn.innerHTML = '<span>Signing in...</span>';
        errorMessage.style.display = 'none';

        try {
            const result = await apiPost('login', {
                username: document.getElementById('username').value,
                password: document.getElementById('password').value
            });
            if (result.success) {
                setSession(result.adminName);
                window.location.href = 'dashboard.html';
            } else {
                errorMessage.textContent = result.message || 'Invalid credentials';
                errorMessage.style.display = 'block';
            }
        } catch (error) {
            console.error('Login error:', error);
            errorMessage.textContent = 'Connection error. Please try again.';
            errorMessage.style.display = 'block';
        } finally {
            submitBtn.disabled = false;
            submitBtn.innerHTML = idleLabel;
        }
    });
}

async function logout() {
    try {
        await apiPost('logout', {});
    } catch (error) {
        console.error('Logout error:', error);
    }
    clearSession();
    window.location.href = 'login.html';
}

// ===== Counters =====
function easeOutCubic(progress) {
    return 1 - Math.pow(1 - progress, 3);
}

function animateNumber(elementId, targetValue) {
    const element = document.getElementById(elementId);
    if (!element) return;

    const startTime = performance.now();

    function update(now) {
        const progress = Math.min((now - startTime) / COUNTER_DURATION_MS, 1);
        element.textContent = Math.round(targetValue * easeOutCubic(progress)).toLocaleString();
        if (progress < 1) {
            requestAnimationFrame(update);
        }
    }

    requestAnimationFrame(update);
}

async function loadDashboardStats() {
    const ids = ['totalStudents', 'totalCourses', 'totalRegistrations', 'pendingRegistrations'];
    try {
        const data = await apiGet('getDashboardStats');
        ids.forEach(id => animateNumber(id, data[id]));
    } catch (error) {
        console.error('Error loading dashboard stats:', error);
        ids.forEach(id => { document.getElementById(id).textContent = '-'; });
    }
}

// ===== Charts =====
function renderChart(canvasId, config) {
    const ctx = document.getElementById(canvasId);
    if (!ctx) return;
    if (charts[canvasId]) {
        charts[canvasId].destroy();
    }
    charts[canvasId] = new Chart(ctx, config);
}

async function loadEnrollmentTrend(yearsBack) {
    try {
        const config = await apiGet(`charts/enrollmentTrend?yearsBack=${yearsBack}`);
        config.options.plugins.tooltip.callbacks = {
            label: context => `Students: ${context.parsed.y.toLocaleString()}`
        };
        config.options.scales.y.ticks.callback = value => value.toLocaleString();
        renderChart('enrollmentTrendChart', config);
    } catch (error) {
        console.error('Error loading enrollment trend:', error);
    }
}

function toggleEnrollmentChart(years) {
    document.querySelectorAll('.chart-toggle .toggle-btn').forEach(btn => {
        btn.classList.toggle('active', parseInt(btn.dataset.years, 10) === years);
    });
    loadEnrollmentTrend(years);
}

async function loadChartData() {
    try {
        renderChart('studentsPerCourseChart', await apiGet('charts/studentsPerCourse'));
        await loadEnrollmentTrend(5);
        renderChart('registrationStatusChart', await apiGet('charts/registrationStatus'));
    } catch (error) {
        console.error('Error loading chart data:', error);
    }
}

// ===== Pending registrations =====
function showPendingCourse(data, courseCode) {
    document.querySelectorAll('#pendingTabs .tab').forEach(tab => {
        tab.classList.toggle('active', tab.dataset.course === courseCode);
    });
    const rows = data.registrations[courseCode] || [];
    document.getElementById('pendingTable').innerHTML = rows.map(row => `<tr>
            <td>${escapeHtml(row.studentId)}</td>
            <td>${escapeHtml(row.studentName)}</td>
            <td>${escapeHtml(row.courseCode)}</td>
            <td>${escapeHtml(row.submittedDate)}</td>
        </tr>`).join('');
}

async function loadPendingRegistrations() {
    try {
        const data = await apiGet('getPendingRegistrations');
        const tabs = document.getElementById('pendingTabs');
        tabs.innerHTML = data.summary.map(course =>
            `<button class="tab" data-course="${escapeHtml(course.courseCode)}">${escapeHtml(course.courseCode)} (${course.pendingCount})</button>`
        ).join('');
        tabs.querySelectorAll('.tab').forEach(tab => {
            tab.addEventListener('click', () => showPendingCourse(data, tab.dataset.course));
        });
        if (data.summary.length > 0) {
            showPendingCourse(data, data.summary[0].courseCode);
        }
    } catch (error) {
        console.error('Error loading pending registrations:', error);
    }
}

// ===== Activity =====
async function loadActivityLog() {
    try {
        const entries = await apiGet('getActivityLog');
        document.getElementById('activityList').innerHTML = entries.map(entry => `<li>
                <div class="activity-icon">${ACTIVITY_ICONS[entry.icon] || '•'}</div>
                <div>
                    <div>${escapeHtml(entry.action)}</div>
                    <div class="activity-meta">${escapeHtml(entry.user)} · ${new Date(entry.time).toLocaleString()}</div>
                </div>
            </li>`).join('');
    } catch (error) {
        console.error('Error loading activity log:', error);
    }
}

// ===== Settings =====
const TEXT_SETTINGS = ['semester', 'startDate', 'endDate'];
const NUMBER_SETTINGS = ['maxCreditHours', 'minCreditHours'];
const FLAG_SETTINGS = ['registrationOpen', 'requireAaApproval', 'emailNewRegistrations', 'emailApprovals', 'dailySummary'];

async function loadSettings() {
    try {
        const settings = await apiGet('getSettings');
        TEXT_SETTINGS.concat(NUMBER_SETTINGS).forEach(key => { document.getElementById(key).value = settings[key]; });
        FLAG_SETTINGS.forEach(key => { document.getElementById(key).checked = settings[key]; });
    } catch (error) {
        console.error('Error loading settings:', error);
    }
}

function bindSettingsForm(form) {
    const message = document.getElementById('settingsMessage');
    form.addEventListener('submit', async function (e) {
        e.preventDefault();
        const settings = {};
        TEXT_SETTINGS.forEach(key => { settings[key] = document.getElementById(key).value; });
        NUMBER_SETTINGS.forEach(key => { settings[key] = parseInt(document.getElementById(key).value, 10); });
        FLAG_SETTINGS.forEach(key => { settings[key] = document.getElementById(key).checked; });

        try {
            const result = await apiPost('saveSettings', settings);
            message.textContent = result.message;
            message.style.color = '#059669';
            loadActivityLog();
        } catch (error) {
            console.error('Error saving settings:', error);
            message.textContent = error instanceof ApiError && error.rejected
                ? 'Settings not saved. Check that every field is filled in with a valid value.'
                : 'Connection error. Please try again.';
            message.style.color = '#dc2626';
        }
        message.style.display = 'block';
    });
}

// ===== Startup =====
document.addEventListener('DOMContentLoaded', function () {
    if (!checkAuth()) return;

    const loginForm = document.getElementById('loginForm');
    if (loginForm) {
        bindLoginForm(loginForm);
    }

    const logoutBtn = document.getElementById('logoutBtn');
    if (logoutBtn) {
        logoutBtn.addEventListener('click', logout);
    }

    if (document.getElementById('totalStudents')) {
        loadDashboardStats();
        loadChartData();
        loadPendingRegistrations();
        loadActivityLog();
        loadSettings();
        bindSettingsForm(document.getElementById('settingsForm'));
    }
});
"#;
