// ============================================
// src/main.rs (메인 파일)
// ============================================

use std::io::{Result, stdout};
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Local;
use clap::Parser;
use console::style;
use dialoguer::{Input, Select};
use rand::seq::SliceRandom;
use reqwest::blocking::Client;

// 한글 초성 추출
mod hangul;

// 라운드 판정 / 기록 / 공유 텍스트
mod round;
use round::{Mark, RoundState, Verdict};

// NEIS 오픈 API (학교 검색, 급식 조회)
mod neis;

// 선택한 학교 저장
mod school;
use school::{DiskSchoolStore, SavedSchool, SchoolStore};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// 공유 텍스트 맨 끝에 붙는 링크
const SHARE_FOOTER: &str = "https://mealsquiz.vercel.app/";

// --------------------------------------------------
// CLI
// --------------------------------------------------

#[derive(Parser)]
#[command(version, about = "급식 초성 퀴즈 - 오늘의 급식을 초성만 보고 맞혀보세요")]
struct Args {
    /// 저장된 학교 대신 이 이름으로 다시 검색해서 선택한다
    #[arg(short, long)]
    school: Option<String>,

    /// 급식일자 (YYYYMMDD, 기본값: 오늘)
    #[arg(short, long)]
    date: Option<String>,

    /// NEIS 오픈 API 인증키
    #[arg(long, default_value = neis::DEFAULT_KEY)]
    key: String,
}

// --------------------------------------------------
// 앱 상태
// --------------------------------------------------

/// 퀴즈 전체의 상태를 관리한다
struct AppState {
    /// 오늘의 음식 이름 목록 (섞은 순서)
    meals: Vec<String>,
    current_quiz_index: usize,

    /// 진행 중인 라운드 (다음 문제로 넘어가면 통째로 교체)
    round: RoundState,

    /// 입력 중인 글자들
    input: String,
    /// 입력 줄 아래에 보여줄 안내 (길이 오류, 정답 알림 등)
    message: Option<String>,
    /// 정답 공개 여부 (Tab 으로 포기했거나 맞혔을 때)
    revealed: bool,
    /// 맞힌 뒤 복사해 갈 공유 텍스트
    share: Option<String>,

    school_name: String,
    date: String,
}

impl AppState {
    fn new(meals: Vec<String>, school_name: String, date: String) -> Self {
        let round = RoundState::new(&meals[0]);
        Self {
            meals,
            current_quiz_index: 0,
            round,
            input: String::new(),
            message: None,
            revealed: false,
            share: None,
            school_name,
            date,
        }
    }

    /// 입력 한 건을 라운드에 넘긴다
    fn submit_input(&mut self) {
        let guess = self.input.trim().to_string();
        match self.round.submit(&guess) {
            Ok(Verdict::Ignored) => {}
            Ok(Verdict::Wrong) => {
                self.message = None;
                self.input.clear();
            }
            Ok(Verdict::Solved) => {
                self.revealed = true;
                self.message = Some("정답! Enter 를 누르면 다음 문제".to_string());
                self.share = Some(round::share_text(
                    &self.round.puzzle,
                    &self.round.history,
                    SHARE_FOOTER,
                ));
                self.input.clear();
            }
            // 길이가 다르면 입력을 남겨 두고 고치게 한다
            Err(err) => self.message = Some(err.to_string()),
        }
    }

    /// 다음 문제로 넘어간다 (라운드 상태는 통째로 새로 만든다)
    fn next_quiz(&mut self) {
        self.current_quiz_index = (self.current_quiz_index + 1) % self.meals.len();
        self.round = RoundState::new(&self.meals[self.current_quiz_index]);
        self.input.clear();
        self.message = None;
        self.revealed = false;
        self.share = None;
    }

    /// 라운드가 끝났는가 (맞혔거나 포기했거나)
    fn round_over(&self) -> bool {
        self.round.solved || self.revealed
    }
}

// --------------------------------------------------
// 시작 흐름 (학교 선택 → 식단 조회 → TUI)
// --------------------------------------------------

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = Client::new();
    let store = DiskSchoolStore;

    let school = select_school(&client, &args, &store)?;
    let date = args
        .date
        .clone()
        .unwrap_or_else(|| Local::now().format("%Y%m%d").to_string());

    println!(
        "{} {} 급식을 불러오는 중...",
        style(&school.name).cyan().bold(),
        style(&date).dim()
    );
    let mut meals = neis::fetch_menu(&client, &args.key, &school, &date)
        .with_context(|| format!("{} ({date}) 식단 조회 실패", school.name))?;
    if meals.is_empty() {
        bail!("해당 날짜의 급식 정보가 없습니다");
    }
    // 매번 같은 순서가 되지 않게 섞는다
    meals.shuffle(&mut rand::rng());

    let mut terminal = setup_terminal()?;
    let app_result = run_app(&mut terminal, AppState::new(meals, school.name, date));
    restore_terminal(&mut terminal)?;
    app_result?;
    Ok(())
}

/// 저장된 학교를 쓰거나, 이름으로 검색해서 새로 고른다
fn select_school(
    client: &Client,
    args: &Args,
    store: &dyn SchoolStore,
) -> anyhow::Result<SavedSchool> {
    // --school 없이 실행했고 저장된 학교가 있으면 그대로 사용
    if args.school.is_none() {
        if let Some(saved) = store.load() {
            println!("저장된 학교: {}", style(&saved.name).cyan().bold());
            return Ok(saved);
        }
    }

    let query = match &args.school {
        Some(name) => name.clone(),
        None => Input::<String>::new().with_prompt("학교 이름").interact_text()?,
    };

    let schools = neis::search_schools(client, &args.key, &query)?;
    if schools.is_empty() {
        bail!("'{query}' 로 검색된 학교가 없습니다");
    }
    let items: Vec<String> = schools
        .iter()
        .map(|s| format!("{} ({})", s.name, s.address))
        .collect();
    let picked = Select::new()
        .with_prompt("학교를 선택하세요")
        .items(&items)
        .default(0)
        .interact()?;

    let chosen = SavedSchool {
        name: schools[picked].name.clone(),
        school_code: schools[picked].school_code.clone(),
        office_code: schools[picked].office_code.clone(),
    };
    store.save(&chosen);
    Ok(chosen)
}

// --------------------------------------------------
// TUI 셋업과 실행 루프
// --------------------------------------------------

fn setup_terminal() -> Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 대체 스크린 사용
    stdout().execute(Hide)?; // 커서 숨김
    let backend = CrosstermBackend::new(stdout());
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(_terminal: &mut Terminal<impl Backend>) -> Result<()> {
    stdout().execute(Show)?; // 커서 다시 표시
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<impl Backend>, mut app_state: AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Backspace => {
                            app_state.input.pop();
                        }
                        // Tab = 포기하고 정답 공개
                        KeyCode::Tab => app_state.revealed = true,
                        KeyCode::Enter => {
                            if app_state.round_over() {
                                app_state.next_quiz();
                            } else {
                                app_state.submit_input();
                            }
                        }
                        KeyCode::Char(c) => {
                            if !app_state.round_over() {
                                app_state.input.push(c);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    Ok(())
}

// --------------------------------------------------
// UI 그리기
// --------------------------------------------------

fn mark_style(mark: Mark) -> Style {
    match mark {
        Mark::Match => Style::default().fg(Color::Green).bold(),
        Mark::Miss => Style::default().fg(Color::DarkGray),
        Mark::Blank => Style::default(),
        Mark::Literal(_) => Style::default().fg(Color::Yellow),
    }
}

/// 글자 사이에 공백 한 칸씩 넣어서 돌려준다 (퍼즐 표시용)
fn spaced_out(text: &str) -> String {
    let mut line = String::new();
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push(c);
    }
    line
}

fn ui(f: &mut Frame, app_state: &AppState) {
    let size = f.area();
    let title = format!(
        "School Meals Quiz - {} ({})",
        app_state.school_name, app_state.date
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    // 왼쪽: 문제 영역 / 오른쪽: 입력 기록
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(inner_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] 진행 상황
            Constraint::Length(1), // [1] 공백
            Constraint::Length(1), // [2] 초성 퍼즐
            Constraint::Length(1), // [3] 정답 공개 줄
            Constraint::Length(1), // [4] 공백
            Constraint::Length(1), // [5] 입력 줄
            Constraint::Length(1), // [6] 안내 메시지
            Constraint::Length(1), // [7] 공백
            Constraint::Min(1),    // [8] 공유 텍스트
            Constraint::Length(1), // [9] 키 안내
        ])
        .split(columns[0]);

    // 0. 진행 상황
    let progress = format!(
        "{} / {} 문제",
        app_state.current_quiz_index + 1,
        app_state.meals.len()
    );
    f.render_widget(
        Paragraph::new(progress).style(Style::default().fg(Color::Magenta)),
        chunks[0],
    );

    // 2. 초성 퍼즐
    f.render_widget(
        Paragraph::new(spaced_out(&app_state.round.puzzle))
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[2],
    );

    // 3. 정답 공개 (맞혔거나 Tab 으로 포기했을 때만)
    if app_state.round_over() {
        let color = if app_state.round.solved {
            Color::Green
        } else {
            Color::Red
        };
        f.render_widget(
            Paragraph::new(format!("정답: {}", app_state.round.name))
                .style(Style::default().fg(color).bold())
                .centered(),
            chunks[3],
        );
    }

    // 5. 입력 줄
    let input_line = Line::from(vec![
        Span::styled("정답 입력 > ", Style::default().fg(Color::Cyan)),
        Span::raw(app_state.input.as_str()),
        Span::styled("_", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(input_line), chunks[5]);

    // 6. 안내 메시지
    if let Some(message) = &app_state.message {
        f.render_widget(
            Paragraph::new(message.as_str()).style(Style::default().fg(Color::Yellow)),
            chunks[6],
        );
    }

    // 8. 공유 텍스트 (맞힌 뒤에만)
    if let Some(share) = &app_state.share {
        let mut lines: Vec<Line> = vec![
            Line::from("─── 복사해서 공유하세요 ───").style(Style::default().fg(Color::DarkGray)),
        ];
        lines.extend(share.lines().map(Line::from));
        f.render_widget(Paragraph::new(lines).centered(), chunks[8]);
    }

    // 9. 키 안내
    f.render_widget(
        Paragraph::new("Enter 제출 · Tab 정답 보기 · Esc 종료")
            .style(Style::default().fg(Color::DarkGray)),
        chunks[9],
    );

    // 오른쪽: 입력 기록 (판정 줄 + 입력 줄)
    let mut history_lines: Vec<Line> = Vec::new();
    for (i, guess) in app_state.round.history.iter().enumerate() {
        let mut mask_spans = vec![Span::styled(
            format!("{:>2}. ", i + 1),
            Style::default().fg(Color::DarkGray),
        )];
        for (j, mark) in guess.marks.iter().enumerate() {
            if j > 0 {
                mask_spans.push(Span::raw(" "));
            }
            mask_spans.push(Span::styled(mark.symbol().to_string(), mark_style(*mark)));
        }
        history_lines.push(Line::from(mask_spans));
        history_lines.push(Line::from(format!("    {}", spaced_out(&guess.text))));
        history_lines.push(Line::from(""));
    }
    f.render_widget(
        Paragraph::new(history_lines).block(Block::default().borders(Borders::LEFT).title("기록")),
        columns[1],
    );
}
