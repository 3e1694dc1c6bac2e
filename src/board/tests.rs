use super::*;
use crate::config::{BoardProfile, StorageConfig};
use crate::draw::{Layer, RED, pixel_alpha, pixel_rgb};
use crate::input::{DeviceEvent, InkMode, MouseButton, Point, SurfaceBounds};
use crate::publish::{JsonlRecordSink, PublishDependencies, PublishManager, PublishOutcome};
use cairo::{Context, Format, ImageSurface};
use std::io::Cursor;

fn png(width: i32, height: i32, rgb: (f64, f64, f64)) -> Vec<u8> {
    let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
    let ctx = Context::new(&surface).unwrap();
    ctx.set_source_rgb(rgb.0, rgb.1, rgb.2);
    ctx.paint().unwrap();
    drop(ctx);
    let mut buffer = Vec::new();
    surface.write_to_png(&mut buffer).unwrap();
    buffer
}

fn board(container_width: u32) -> Board {
    Board::new(
        BoardProfile::new("bg.png", "sixtypes", "sixtypes"),
        BoardSettings {
            container_width,
            ..BoardSettings::default()
        },
    )
}

fn loaded_board(container_width: u32, image: (i32, i32)) -> Board {
    let mut board = board(container_width);
    board
        .install_background(&png(image.0, image.1, (0.0, 0.0, 1.0)))
        .unwrap();
    board
}

fn press(board: &mut Board, x: f64, y: f64) {
    board
        .handle_input(
            DeviceEvent::MouseDown {
                button: MouseButton::Left,
                x,
                y,
            },
            SurfaceBounds::default(),
        )
        .unwrap();
}

fn move_to(board: &mut Board, x: f64, y: f64) {
    board
        .handle_input(DeviceEvent::MouseMove { x, y }, SurfaceBounds::default())
        .unwrap();
}

fn release(board: &mut Board) {
    board
        .handle_input(
            DeviceEvent::MouseUp {
                button: MouseButton::Left,
            },
            SurfaceBounds::default(),
        )
        .unwrap();
}

fn drag(board: &mut Board, points: &[(f64, f64)]) {
    let ((x, y), rest) = points.split_first().unwrap();
    press(board, *x, *y);
    for (x, y) in rest {
        move_to(board, *x, *y);
    }
    release(board);
}

fn decoded_pixel(png_data: &[u8], x: i32, y: i32) -> u32 {
    let mut surface = ImageSurface::create_from_png(&mut Cursor::new(png_data)).unwrap();
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    let offset = y as usize * stride + x as usize * 4;
    u32::from_ne_bytes(data[offset..offset + 4].try_into().unwrap())
}

#[test]
fn new_board_starts_unloaded() {
    let board = board(1024);
    assert_eq!(board.phase(), BoardPhase::Unloaded);
    assert!(!board.is_drawing_enabled());
    assert_eq!(board.dimensions(), None);
    assert_eq!(board.style().eraser_diameter, 20.0);
}

#[test]
fn install_background_fits_container_width() {
    let mut board = board(1024);
    let intrinsic = board
        .install_background(&png(1200, 600, (0.0, 0.0, 1.0)))
        .unwrap();
    assert_eq!(intrinsic, (1200, 600));
    assert_eq!(board.dimensions(), Some((1024, 512)));
    assert_eq!(board.phase(), BoardPhase::Ready);
}

#[test]
fn input_is_ignored_until_loaded() {
    let mut board = board(200);
    let tracked = board
        .handle_input(
            DeviceEvent::TouchStart {
                touches: vec![Point::new(10.0, 10.0)],
            },
            SurfaceBounds::default(),
        )
        .unwrap();
    assert_eq!(tracked.stroke, None);
    assert!(!tracked.prevent_default);
    assert_eq!(board.phase(), BoardPhase::Unloaded);
}

#[test]
fn stroke_moves_board_through_drawing_phase() {
    let mut board = loaded_board(200, (200, 100));
    press(&mut board, 10.0, 10.0);
    assert_eq!(board.phase(), BoardPhase::Drawing);
    move_to(&mut board, 50.0, 10.0);
    release(&mut board);
    assert_eq!(board.phase(), BoardPhase::Ready);
}

#[test]
fn touch_stroke_requests_default_suppression() {
    let mut board = loaded_board(200, (200, 100));
    let bounds = SurfaceBounds::new(5.0, 5.0);
    let start = board
        .handle_input(
            DeviceEvent::TouchStart {
                touches: vec![Point::new(25.0, 25.0)],
            },
            bounds,
        )
        .unwrap();
    assert!(start.prevent_default);
    board
        .handle_input(
            DeviceEvent::TouchMove {
                touches: vec![Point::new(85.0, 25.0)],
            },
            bounds,
        )
        .unwrap();
    board.handle_input(DeviceEvent::TouchEnd, bounds).unwrap();

    // Segment painted from (20,20) to (80,20) in surface space.
    let argb = board.pixel(Layer::Ink, 50, 20).unwrap();
    assert_eq!(pixel_alpha(argb), 255);
}

#[test]
fn identical_input_produces_identical_ink() {
    let path = [(10.0, 10.0), (60.0, 40.0), (120.0, 15.0), (180.0, 80.0)];
    let mut first = loaded_board(200, (400, 200));
    let mut second = loaded_board(200, (400, 200));
    for board in [&mut first, &mut second] {
        board.set_line_color(RED);
        drag(board, &path);
    }

    let ink = first.layer_bytes(Layer::Ink).unwrap();
    assert!(ink.iter().any(|b| *b != 0));
    assert_eq!(ink, second.layer_bytes(Layer::Ink).unwrap());
}

#[test]
fn clear_then_flatten_matches_background() {
    let mut board = loaded_board(300, (300, 150));
    board.set_line_color(RED);
    drag(&mut board, &[(20.0, 20.0), (200.0, 120.0)]);

    board.clear().unwrap();

    let flattened = board.flatten().unwrap();
    assert_eq!(
        flattened.data(),
        board.layer_bytes(Layer::Background).unwrap().as_slice()
    );
}

#[test]
fn erase_only_touches_ink() {
    let mut board = loaded_board(200, (200, 100));
    let background = board.layer_bytes(Layer::Background).unwrap();

    board.set_line_color(RED);
    drag(&mut board, &[(20.0, 50.0), (180.0, 50.0)]);
    board.set_mode(InkMode::Erase);
    board.set_eraser_diameter(10.0);
    drag(&mut board, &[(60.0, 50.0), (140.0, 50.0)]);

    assert_eq!(pixel_alpha(board.pixel(Layer::Ink, 100, 50).unwrap()), 0);
    assert_eq!(pixel_alpha(board.pixel(Layer::Ink, 30, 50).unwrap()), 255);
    assert_eq!(board.layer_bytes(Layer::Background).unwrap(), background);
}

#[test]
fn resize_round_trip_restores_background() {
    let mut board = loaded_board(640, (1200, 600));
    let original = board.layer_bytes(Layer::Background).unwrap();

    assert_eq!(board.resize(333).unwrap(), Some((333, 167)));
    assert_eq!(board.resize(640).unwrap(), Some((640, 320)));

    assert_eq!(board.layer_bytes(Layer::Background).unwrap(), original);
}

#[test]
fn resize_before_load_is_recorded() {
    let mut board = board(1024);
    assert_eq!(board.resize(600).unwrap(), None);
    board
        .install_background(&png(1200, 600, (1.0, 1.0, 1.0)))
        .unwrap();
    assert_eq!(board.dimensions(), Some((600, 300)));
}

#[test]
fn resize_mid_stroke_finalizes_gesture() {
    let mut board = loaded_board(200, (200, 100));
    press(&mut board, 10.0, 10.0);
    move_to(&mut board, 40.0, 10.0);

    board.resize(400).unwrap();
    assert_eq!(board.phase(), BoardPhase::Ready);

    // The old gesture is gone, so further motion paints nothing.
    move_to(&mut board, 300.0, 150.0);
    assert_eq!(board.phase(), BoardPhase::Ready);
    assert_eq!(board.pixel(Layer::Ink, 200, 150), Some(0));
    // Ink drawn before the resize is scaled onto the new surface.
    assert_eq!(pixel_alpha(board.pixel(Layer::Ink, 50, 20).unwrap()), 255);
}

#[test]
fn clear_is_gated_by_phase() {
    let mut unloaded = board(100);
    assert!(unloaded.clear().is_ok());

    let mut board = loaded_board(100, (100, 50));
    press(&mut board, 5.0, 5.0);
    assert!(matches!(board.clear(), Err(BoardError::StrokeInProgress)));
    release(&mut board);
    assert!(board.clear().is_ok());
}

#[test]
fn failed_reload_keeps_previous_surfaces() {
    let mut board = loaded_board(200, (200, 100));
    let err = board.install_background(b"not an image").unwrap_err();
    assert!(matches!(err, BoardError::ImageLoad(_)));
    assert_eq!(board.phase(), BoardPhase::Ready);
    assert_eq!(board.dimensions(), Some((200, 100)));
    assert!(board.load_error().is_some());
}

#[test]
fn oversized_reload_keeps_previous_background() {
    let mut board = loaded_board(8192, (8192, 100));

    // Fitted to 8192px wide, a 10x100 image would exceed Cairo's size limit.
    let err = board
        .install_background(&png(10, 100, (1.0, 0.0, 0.0)))
        .unwrap_err();
    assert!(matches!(err, BoardError::ImageLoad(_)));
    assert_eq!(board.phase(), BoardPhase::Ready);

    assert_eq!(board.resize(400).unwrap(), Some((400, 5)));
    let argb = board.pixel(Layer::Background, 5, 2).unwrap();
    assert_eq!(pixel_rgb(argb), (0, 0, 255));
}

#[test]
fn oversized_first_load_stays_unloaded() {
    let mut board = board(8192);
    let err = board
        .install_background(&png(10, 100, (1.0, 0.0, 0.0)))
        .unwrap_err();
    assert!(matches!(err, BoardError::ImageLoad(_)));
    assert_eq!(board.phase(), BoardPhase::Unloaded);

    assert_eq!(board.resize(100).unwrap(), None);
    assert_eq!(board.dimensions(), None);
}

#[test]
fn eraser_preview_follows_cursor_in_erase_mode() {
    let mut board = loaded_board(200, (200, 100));
    move_to(&mut board, 40.0, 30.0);
    assert_eq!(board.eraser_preview(), None);

    board.set_mode(InkMode::Erase);
    board.set_eraser_diameter(30.0);
    move_to(&mut board, 50.0, 60.0);
    assert_eq!(board.eraser_preview(), Some((Point::new(50.0, 60.0), 30.0)));

    board
        .handle_input(DeviceEvent::MouseLeave, SurfaceBounds::default())
        .unwrap();
    assert_eq!(board.eraser_preview(), None);
}

#[test]
fn render_composes_preview_over_layers() {
    let mut board = loaded_board(100, (100, 100));
    board.set_mode(InkMode::Erase);
    move_to(&mut board, 50.0, 50.0);

    let mut target = ImageSurface::create(Format::ARgb32, 100, 100).unwrap();
    {
        let ctx = Context::new(&target).unwrap();
        board.render(&ctx);
    }
    let stride = target.stride() as usize;
    let data = target.data().unwrap();
    let read = |x: usize, y: usize| {
        let offset = y * stride + x * 4;
        u32::from_ne_bytes(data[offset..offset + 4].try_into().unwrap())
    };

    // Far from the cursor: plain blue background.
    assert_eq!(pixel_rgb(read(5, 5)), (0, 0, 255));
    // Under the disc: white blended over blue.
    let (r, g, b) = pixel_rgb(read(50, 50));
    assert!(r > 150 && g > 150 && b == 255, "got {:?}", (r, g, b));
}

#[test]
fn render_unloaded_board_draws_placeholder() {
    let board = board(100);
    let mut target = ImageSurface::create(Format::ARgb32, 100, 80).unwrap();
    {
        let ctx = Context::new(&target).unwrap();
        board.render(&ctx);
    }
    let stride = target.stride() as usize;
    let data = target.data().unwrap();
    let alpha = |x: usize, y: usize| {
        let offset = y * stride + x * 4;
        pixel_alpha(u32::from_ne_bytes(
            data[offset..offset + 4].try_into().unwrap(),
        ))
    };
    assert_eq!(alpha(50, 25), 255);
    // 100px wide at the placeholder ratio is 50px tall.
    assert_eq!(alpha(50, 49), 255);
    assert_eq!(alpha(50, 60), 0);
}

#[tokio::test]
async fn export_before_load_fails() {
    let mut board = board(1024);
    assert!(matches!(
        board.export().await,
        Err(BoardError::ExportNotReady)
    ));
}

#[tokio::test]
async fn export_during_stroke_fails() {
    let mut board = loaded_board(100, (100, 50));
    press(&mut board, 5.0, 5.0);
    assert!(matches!(
        board.export().await,
        Err(BoardError::StrokeInProgress)
    ));
}

#[tokio::test]
async fn drawn_then_erased_stroke_leaves_no_trace_in_export() {
    let mut board = loaded_board(1024, (1200, 600));
    assert_eq!(board.dimensions(), Some((1024, 512)));
    let background = board.pixel(Layer::Background, 150, 100).unwrap();

    board.set_line_color(RED);
    drag(&mut board, &[(100.0, 100.0), (200.0, 100.0)]);

    let red = board.pixel(Layer::Ink, 150, 100).unwrap();
    assert_eq!(pixel_alpha(red), 255);
    assert_eq!(pixel_rgb(red), (255, 0, 0));
    assert_eq!(pixel_alpha(board.pixel(Layer::Ink, 150, 99).unwrap()), 255);

    board.set_mode(InkMode::Erase);
    assert_eq!(board.set_eraser_diameter(20.0), 20.0);
    drag(&mut board, &[(100.0, 100.0), (200.0, 100.0)]);

    assert_eq!(pixel_alpha(board.pixel(Layer::Ink, 150, 100).unwrap()), 0);
    assert!(
        board
            .layer_bytes(Layer::Ink)
            .unwrap()
            .iter()
            .all(|b| *b == 0)
    );
    assert_eq!(board.pixel(Layer::Background, 150, 100).unwrap(), background);

    let exported = board.export().await.unwrap();
    let argb = decoded_pixel(&exported, 150, 100);
    assert_eq!(pixel_rgb(argb), (0, 0, 255));
}

#[tokio::test]
async fn load_background_reads_from_asset_dir() {
    let temp = tempfile::TempDir::new().unwrap();
    std::fs::write(temp.path().join("bg.png"), png(300, 100, (1.0, 0.0, 0.0))).unwrap();
    let loader = FileBackgroundLoader::new(temp.path());

    let mut board = board(150);
    assert_eq!(board.load_background(&loader).await.unwrap(), (300, 100));
    assert_eq!(board.dimensions(), Some((150, 50)));
    assert_eq!(board.load_error(), None);
}

#[tokio::test]
async fn missing_background_leaves_board_unloaded() {
    let temp = tempfile::TempDir::new().unwrap();
    let loader = FileBackgroundLoader::new(temp.path());

    let mut board = board(150);
    let err = board.load_background(&loader).await.unwrap_err();
    assert!(matches!(err, BoardError::ImageLoad(_)));
    assert_eq!(board.phase(), BoardPhase::Unloaded);
    assert!(
        board
            .load_error()
            .unwrap()
            .starts_with("Background image could not be loaded")
    );
}

#[tokio::test]
async fn save_uploads_and_records_for_subject() {
    let temp = tempfile::TempDir::new().unwrap();
    let storage = StorageConfig {
        directory: temp.path().join("images").to_string_lossy().into_owned(),
        records_file: temp
            .path()
            .join("records.jsonl")
            .to_string_lossy()
            .into_owned(),
    };
    let publisher = PublishManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        PublishDependencies::local(&storage),
    );

    let mut board = loaded_board(100, (100, 50));
    drag(&mut board, &[(10.0, 10.0), (90.0, 40.0)]);

    let outcome = board
        .save(&publisher, "participant-1")
        .await
        .unwrap()
        .await
        .unwrap();

    let PublishOutcome::Success(result) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    let stored = temp
        .path()
        .join("images")
        .join("sixtypes")
        .join(&result.filename);
    assert!(stored.exists());

    let rows = JsonlRecordSink::new(temp.path().join("records.jsonl"))
        .read_all()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].participant_id, "participant-1");
    assert_eq!(rows[0].image_url, result.image_url);
}

#[tokio::test]
async fn save_before_load_reports_export_error() {
    let publisher = PublishManager::with_dependencies(
        &tokio::runtime::Handle::current(),
        PublishDependencies::local(&StorageConfig::default()),
    );
    let mut board = board(100);
    let err = board.save(&publisher, "p").await.unwrap_err();
    assert!(matches!(
        err,
        crate::publish::PublishError::Export(BoardError::ExportNotReady)
    ));
}
